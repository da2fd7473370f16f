use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::events::handler::send_event,
        crate::modules::video_resource::handler::get_video_resource,
        crate::modules::tips::handler::update_tip,
        crate::modules::tips::handler::generate_title,
    ),
    components(
        schemas(
            crate::common::response::ResponseStatus,
            crate::modules::events::dto::SendEventRequest,
            crate::modules::events::dto::SendEventResponse,
            crate::modules::video_resource::model::VideoResource,
            crate::modules::video_resource::model::VideoResourceState,
            crate::modules::tips::model::Tip,
            crate::modules::tips::dto::UpdateTipRequest,
            crate::modules::tips::dto::UpdateTipResponse,
            crate::modules::tips::dto::GenerateTitleResponse,
        )
    ),
    tags(
        (name = "Events", description = "Workflow event ingestion"),
        (name = "Content", description = "Video resources"),
        (name = "Tips", description = "Tip authoring")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/events",
            "/api/v1/video-resources/{id}",
            "/api/v1/tips/{id}",
            "/api/v1/tips/{id}/generate-title",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
