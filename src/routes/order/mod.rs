pub mod analytics;
pub mod delete;
pub mod export;
pub mod get;
pub mod payment;
pub mod post;
pub mod search;
pub mod update;

pub use analytics::{get_all_orders_overview, get_customers_page, get_orders_per_day, get_orders_per_month, get_revenue_overview, get_status_overview};
pub use delete::cancel_order_by_id;
pub use export::export_orders;
pub use get::{get_order_by_id, get_orders_of_user};
pub use payment::{check_payment, check_stripe_payment};
pub use post::post_order;
pub use search::search_orders_by_key;
pub use update::edit_order;
