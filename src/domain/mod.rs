pub mod artifact;
pub mod codes;
pub mod orchestrator;
pub mod poller;
pub mod portal;
pub mod settings;
pub mod upload;
pub mod wizard;
pub mod wizard_payload;
