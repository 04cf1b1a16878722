use cosmwasm_std::Event;
use cw_multi_test::AppResponse;

pub trait AppResponseExt {
    /// Append the events of `with`, keeping `self.data` unless it is unset.
    fn merge(self, with: AppResponse) -> AppResponse;

    fn add_event(self, event: Event) -> AppResponse;
}

impl AppResponseExt for AppResponse {
    fn merge(self, with: AppResponse) -> AppResponse {
        let mut base = self;

        let mut with = with;

        base.events.append(&mut with.events);

        if base.data.is_none() {
            base.data = with.data;
        }

        base
    }

    fn add_event(self, event: Event) -> AppResponse {
        let mut base = self;
        base.events.push(event);
        base
    }
}
