pub mod playback;
pub mod reader;
pub mod speech;
pub mod voice;
