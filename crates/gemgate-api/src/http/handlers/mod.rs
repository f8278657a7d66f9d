pub mod gemini;
pub mod home;
