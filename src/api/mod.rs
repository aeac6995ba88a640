pub mod job_dto;
pub mod resource_dto;
pub mod status_dto;
