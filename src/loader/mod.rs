pub mod parser;
pub mod plan_dto;
