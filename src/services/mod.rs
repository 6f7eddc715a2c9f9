//! Clients for the three cloud services the relay glues together.

pub mod recognizer;
pub mod synthesizer;
pub mod translator;

pub use recognizer::{HttpRecognizer, MockRecognizer, SpeechRecognizer};
pub use synthesizer::{HttpSynthesizer, MockSynthesizer, SpeechSynthesizer};
pub use translator::{HttpTranslator, MockTranslator, Translator};
