mod time_log;
mod wire;
mod work_item;

pub use time_log::{TimeLogDocuments, TimeLogEntry};
pub use work_item::{PatchOperation, WiqlQuery, WiqlQueryResult, WorkItemId, WorkItemReference};
