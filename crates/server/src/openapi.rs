use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Stored student as serialized on the wire.
#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct StudentDoc {
    pub _id: Uuid,
    pub name: String,
    pub email: String,
    pub course: String,
    pub batch: String,
    #[schema(example = "A+")]
    pub grade: String,
    #[schema(example = "2024-09-01")]
    pub dateOfAdmission: String,
    pub createdAt: String,
    pub updatedAt: String,
}

/// Create/replace body. Unknown keys, `_id` and timestamps are ignored.
#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct StudentInputDoc {
    pub name: String,
    pub email: String,
    pub course: String,
    pub batch: String,
    /// One of A+, A, B+, B, C+, C, D, F
    pub grade: String,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp
    pub dateOfAdmission: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::students::list,
        crate::routes::students::get,
        crate::routes::students::create,
        crate::routes::students::update,
        crate::routes::students::delete,
    ),
    components(schemas(HealthResponse, StudentDoc, StudentInputDoc)),
    tags(
        (name = "health"),
        (name = "students")
    )
)]
pub struct ApiDoc;
