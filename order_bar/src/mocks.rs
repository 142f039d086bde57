use mockall::mock;

use crate::{
    errors::{FetchError, NotifyError},
    metrics::{OrderCountSource, OrderWindow},
    notifier::StatusSink,
};

mock! {
    pub OrderCounter {}
    impl OrderCountSource for OrderCounter {
        async fn count_orders_in(&self, window: &OrderWindow) -> Result<u64, FetchError>;
    }
}

mock! {
    pub Sink {}
    impl StatusSink for Sink {
        async fn push_status(&self, text: &str, icon_path: &str) -> Result<(), NotifyError>;
    }
}
