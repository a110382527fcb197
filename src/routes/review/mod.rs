pub mod delete;
pub mod get;
pub mod post;
pub mod reply;
pub mod statistic;
pub mod update;

pub use delete::delete_review;
pub use get::{get_reviews_by_stars, get_reviews_of_product, get_reviews_of_user};
pub use post::post_reviews;
pub use reply::reply_review;
pub use statistic::get_review_statistic;
pub use update::edit_review;

pub const MAX_COMMENT_LENGTH: usize = 2000;
pub const MAX_REPLY_LENGTH: usize = 1000;

pub fn validate_comment(comment: &str) -> Result<(), String>{
    if comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(format!("Comment must be at most {} characters", MAX_COMMENT_LENGTH))
    }
    Ok(())
}
