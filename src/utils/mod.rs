pub mod html;
pub mod token;
