pub mod get;
pub mod post;

pub use get::{get_product_by_id, get_products_page};
pub use post::post_product;
