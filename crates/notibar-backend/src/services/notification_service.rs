use notibar_bridge::MessageFromBackend;
use notibar_bridge::region::RegionSnapshot;
use notibar_dom::ElementSnapshot;

/// Converts a document-level element snapshot into its bridge representation.
pub(crate) fn region_snapshot(element: ElementSnapshot) -> RegionSnapshot {
    RegionSnapshot {
        html: element.to_html(),
        visible: element.is_visible(),
        id: element.id,
        text: element.text,
    }
}

/// Handles an incoming show request (see
/// [`notibar_bridge::MessageToBackend::Show`]).
///
/// Region changes reach the frontend through the document's mutation stream,
/// so only failures are answered here.
pub async fn handle_show_request(context: super::AppContextHandle, message: String) {
    let display = {
        let state = context.state.read().await;
        state.display.clone()
    };

    if let Err(error) = display.show(message.clone()) {
        context
            .send(MessageFromBackend::ShowFailed {
                message,
                reason: error.to_string(),
            })
            .await;
    }
}

/// Handles a region snapshot request (see
/// [`notibar_bridge::MessageToBackend::RegionSnapshotRequest`]).
pub async fn handle_region_snapshot_request(context: super::AppContextHandle) {
    let (document, region_id) = {
        let state = context.state.read().await;
        (state.document.clone(), state.config.region_id.clone())
    };

    match document.get_element_by_id(&region_id) {
        Ok(region) => {
            context
                .send(MessageFromBackend::RegionUpdated(region_snapshot(
                    region.snapshot(),
                )))
                .await;
        }
        Err(error) => log::error!("Could not snapshot the notification region: {error}"),
    }
}
