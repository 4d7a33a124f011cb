//! Booking entry point: identity gate and profile prefetch

use super::FormWorkflow;
use crate::config::WorkflowConfig;
use crate::remote::{Identity, NavigationRequest, Navigator, RemoteBackend};
use crate::state::FormKind;
use std::rc::Rc;
use std::sync::Arc;

pub enum BookingStart {
    /// The form is ready; the profile has been fetched if one exists
    Ready {
        workflow: FormWorkflow,
        identity: Identity,
    },
    /// No known visitor; sent to the anonymous entry route instead
    Redirected(NavigationRequest),
}

/// Open the booking form for `identity`.
///
/// Booking needs a known visitor. An absent or anonymous identity redirects
/// straight away and no workflow is created. Otherwise the visitor's profile
/// is fetched before the form is handed back; a failed lookup still yields a
/// usable form.
pub async fn start_booking(
    identity: Option<Identity>,
    backend: Arc<dyn RemoteBackend>,
    navigator: Arc<dyn Navigator>,
    config: Rc<WorkflowConfig>,
) -> BookingStart {
    let identity = match identity {
        Some(identity) if !identity.is_anonymous => identity,
        other => {
            let reason = if other.is_some() { "anonymous" } else { "absent" };
            let request = NavigationRequest::new(config.anonymous_route.clone(), None);
            tracing::info!(reason, path = %request.path, "booking needs a known visitor; redirecting");
            navigator.navigate(&request);
            return BookingStart::Redirected(request);
        }
    };

    let workflow = FormWorkflow::new(FormKind::Booking, backend, navigator, config);
    workflow.fetch_and_apply_profile(&identity.email).await;
    BookingStart::Ready { workflow, identity }
}
