/// Post handlers - HTTP endpoints for post operations
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::PostView;
use crate::services::PostService;
use actix_web::dev::Payload;
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JSON request body. A request that does not declare a JSON content type is
/// read as an empty object, so required fields report their own message.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for JsonBody<T>
where
    T: DeserializeOwned + Default + 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if !declares_json(req) {
            return Box::pin(async { Ok(JsonBody(T::default())) });
        }

        let json = web::Json::<T>::from_request(req, payload);
        Box::pin(async move { json.await.map(|body| JsonBody(body.into_inner())) })
    }
}

fn declares_json(req: &HttpRequest) -> bool {
    let content_type = req.content_type();
    content_type.eq_ignore_ascii_case("application/json") || content_type.ends_with("+json")
}

#[derive(Debug, Default, Deserialize)]
pub struct CreatePostRequest {
    pub content: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub content: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddCommentRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedResponse {
    pub success: bool,
    pub count: usize,
    pub posts: Vec<PostView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostResponse {
    pub success: bool,
    pub message: String,
    pub post: PostView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeResponse {
    pub success: bool,
    pub message: String,
    pub liked: bool,
    pub post: PostView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl PostResponse {
    fn new(message: &str, post: PostView) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            post,
        }
    }
}

/// List the feed
/// GET /api/posts
pub async fn list_posts(
    service: web::Data<PostService>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let posts = service
        .list_feed(user_id.0)
        .await
        .map_err(AppError::during("Error fetching posts"))?;

    Ok(HttpResponse::Ok().json(FeedResponse {
        success: true,
        count: posts.len(),
        posts,
    }))
}

/// Create a new post
/// POST /api/posts
pub async fn create_post(
    service: web::Data<PostService>,
    user_id: UserId,
    req: JsonBody<CreatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let post = service
        .create_post(user_id.0, req.content.as_deref(), req.image)
        .await
        .map_err(AppError::during("Error creating post"))?;

    Ok(HttpResponse::Created().json(PostResponse::new("Post created successfully", post)))
}

/// Update a post's content or image
/// PUT /api/posts/{post_id}
pub async fn update_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: JsonBody<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let post = service
        .update_post(user_id.0, post_id.into_inner(), req.content, req.image)
        .await
        .map_err(AppError::during("Error updating post"))?;

    Ok(HttpResponse::Ok().json(PostResponse::new("Post updated successfully", post)))
}

/// Delete a post
/// DELETE /api/posts/{post_id}
pub async fn delete_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service
        .delete_post(user_id.0, post_id.into_inner())
        .await
        .map_err(AppError::during("Error deleting post"))?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: "Post deleted successfully".to_string(),
    }))
}

/// Like or unlike a post
/// POST /api/posts/{post_id}/like
pub async fn toggle_like(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let outcome = service
        .toggle_like(user_id.0, post_id.into_inner())
        .await
        .map_err(AppError::during("Error liking post"))?;

    let message = if outcome.liked {
        "Post liked"
    } else {
        "Post unliked"
    };

    Ok(HttpResponse::Ok().json(LikeResponse {
        success: true,
        message: message.to_string(),
        liked: outcome.liked,
        post: outcome.post,
    }))
}

/// Add a comment to a post
/// POST /api/posts/{post_id}/comment
pub async fn add_comment(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: JsonBody<AddCommentRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let post = service
        .add_comment(user_id.0, post_id.into_inner(), req.text.as_deref())
        .await
        .map_err(AppError::during("Error adding comment"))?;

    Ok(HttpResponse::Created().json(PostResponse::new("Comment added successfully", post)))
}
