//! Authentication and authorization.
//!
//! Authors log in once at `POST /token` with their username and password and receive a signed,
//! time-limited bearer token. Every mutating route then takes `Authorization: Bearer <token>`,
//! which is resolved back to the author on each request. There is no server-side session state:
//! a token stays valid until it expires.
//!
//! Authorization is ownership only. An author can create and delete their own posts and delete
//! their own account; reads are public.
//!
//! # Modules
//!
//! - [`password`]: Argon2id hashing and verification
//! - [`token`]: JWT creation and verification ([`token::TokenCodec`])
//! - [`store`]: [`store::Identity`] and the [`store::CredentialStore`] lookup it comes from
//! - [`authenticator`]: username/password check
//! - [`session`]: bearer token to [`store::Identity`]
//! - [`permissions`]: ownership checks
//! - [`current_user`]: the request extractor for authenticated handlers
//! - [`error`]: [`error::AuthError`] and how it is reported to clients
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use quill::auth::{permissions::require_owner, store::Identity};
//!
//! async fn delete_post(
//!     State(state): State<AppState>,
//!     Path(post_id): Path<PostId>,
//!     current_user: Identity,
//! ) -> Result<StatusCode> {
//!     let post = /* load the post */;
//!     require_owner(&current_user, post.owner_id, Operation::DeleteOwn, Resource::Posts)?;
//!     /* delete it */
//! }
//! ```

pub mod authenticator;
pub mod current_user;
pub mod error;
pub mod password;
pub mod permissions;
pub mod session;
pub mod store;
pub mod token;
