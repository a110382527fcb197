pub mod new_order;
pub mod order_status;
pub mod pagination;
pub mod payment_method;
pub mod phone_number;
pub mod rating;
pub mod receiver;
pub mod review_image;
pub mod user_email;

pub use new_order::{NewOrderItem, NewOrderRequest};
pub use order_status::OrderStatus;
pub use pagination::{PageQuery, Pagination};
pub use payment_method::PaymentMethod;
pub use phone_number::PhoneNumberDomain;
pub use rating::Rating;
pub use review_image::ReviewImage;
pub use user_email::UserEmail;
