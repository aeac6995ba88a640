pub mod http;
pub mod portal;
pub mod transport_mock;
