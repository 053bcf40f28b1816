pub mod event;
pub mod requests;

pub use event::{Event, EventStatus, TimeSlot};
pub use requests::{
    CancelRequest, CreateRequest, DeleteRequest, EventResponse, GetRequest, ListRequest,
    RescheduleRequest, UpdateDetailsRequest, MAX_LIST_LIMIT,
};
