//! Seed greetings for fresh transcripts.

use crate::identity::Identity;
use crate::transcript::Turn;

/// Builds the greeting turn a fresh transcript is seeded with.
///
/// The wording depends on the identity: anonymous visitors are told the
/// conversation only lasts for their session, identified visitors are
/// greeted by name.
pub fn seed_greeting(identity: &Identity) -> Turn {
    match identity {
        Identity::Anonymous => Turn::assistant(
            "Bonjour ! Je suis là pour vous aider à créer votre portfolio. \
             Notez que cette conversation ne sera conservée que le temps de \
             votre session. Comment puis-je vous assister aujourd'hui ?",
        ),
        Identity::Named(name) => Turn::assistant(format!(
            "Bonjour {name} ! Ravi de vous revoir. \
             Comment puis-je vous aider avec votre portfolio aujourd'hui ?"
        )),
    }
}
