//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{
    DeliveryResponse, DirectDeliveryResponse, PayloadRequest, ProductCreatedRequest, PushRequest,
    RealtimeStatusResponse, TaskAssignedRequest,
};
use super::handlers::{notifications, realtime, system};

/// Generated OpenAPI specification, served by Swagger UI at `/docs`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "taskhub-gateway",
        description = "Real-time notification gateway for the taskhub backend"
    ),
    paths(
        system::health_handler,
        realtime::realtime_status,
        realtime::broadcast,
        realtime::send_to_user,
        realtime::push,
        notifications::product_created,
        notifications::task_assigned,
    ),
    components(schemas(
        RealtimeStatusResponse,
        PayloadRequest,
        PushRequest,
        DeliveryResponse,
        DirectDeliveryResponse,
        ProductCreatedRequest,
        TaskAssignedRequest,
    )),
    tags(
        (name = "System", description = "Service health"),
        (name = "Realtime", description = "Connection registry introspection and delivery"),
        (name = "Notifications", description = "Typed application events"),
    )
)]
pub struct ApiDoc;
