pub mod decode;
pub mod fetch;
pub mod logos;
pub mod palette;
