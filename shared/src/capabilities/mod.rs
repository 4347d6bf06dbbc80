mod http;
mod timer;

pub use self::http::{HttpMethod, InvalidUrl, ValidatedUrl, MAX_URL_LENGTH};
pub use self::timer::{Timer, TimerId, TimerOperation, TimerOutput};

// Crux's built-in capabilities cover view updates and HTTP as-is.
pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub http: Http<Event>,
    pub timer: Timer<Event>,
}
