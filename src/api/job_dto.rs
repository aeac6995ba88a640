use serde::{Deserialize, Serialize};

use crate::domain::portal::{JobId, ResourceId};

/// Body of the job-creation POST. Field names and single-letter codes are
/// the backend's contract; the constant tail fields are carried verbatim
/// from the portal's job record.
///
/// This is the forecasting job record, used as the canonical payload for
/// every domain's jobs resource. Monitoring and ML job records accept a
/// superset/subset of these fields server-side; fields they do not know
/// (solver, depth, the interpolation constants) are ignored there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayloadDto {
    pub user: i64,
    pub group: i64,
    pub timeseries: ResourceId,
    pub model: String,
    pub mode: String,
    pub method: String,
    pub optimizer: Option<String>,
    pub error_metric: String,
    pub parameter_ranges_file: Option<ResourceId>,
    pub validation_required: String,
    pub percent: u8,
    pub user_validation_file: Option<ResourceId>,
    pub parameters_file: Option<ResourceId>,
    pub parameters_forward: Option<ResourceId>,
    pub forward_options: Option<String>,
    pub solver: String,
    pub interpolate: bool,
    pub n_data_interpolate: u32,
    pub core: u32,
    pub depth: f64,
    pub compiler: String,
    pub databaseformat: String,
    pub computeparameterranges: bool,
    pub computeparameters: bool,
    pub log_flag: bool,
    pub resampling_frequency_days: u32,
    pub resampling_frequency_weeks: u32,
    pub email_send: bool,
    pub email_list: String,
}

/// One entry of the jobs-resource listing, used to seed the status poller
/// for a group's existing jobs.
#[derive(Debug, Clone, Deserialize)]
pub struct JobRecordDto {
    pub id: JobId,
    pub model: Option<String>,
    pub mode: Option<String>,
    pub optimizer: Option<String>,
}
