use notibar_bridge::config::HidePolicy;
use notibar_bridge::status::StatusLevel;

/// Handles an incoming configuration request (see
/// [`notibar_bridge::MessageToBackend::ConfigurationRequest`]).
pub async fn handle_config_request(context: super::AppContextHandle) {
    let config = {
        let state = context.state.read().await;
        state.config.clone()
    };
    context
        .send(notibar_bridge::MessageFromBackend::ConfigurationResponse(
            config,
        ))
        .await;
}

/// Handles a hide policy selection, applies it to the live display and
/// persists it to config.
pub async fn handle_hide_policy_selection(context: super::AppContextHandle, policy: HidePolicy) {
    let (config, config_path) = {
        let mut state = context.state.write().await;
        state.display.set_hide_policy(policy);
        state.config.hide_policy = policy;
        (state.config.clone(), state.config_path.clone())
    };
    log::info!("Hide policy set to {policy}");

    let Some(config_path) = config_path else {
        log::warn!("No usable configuration file, hide policy will not be remembered");
        context
            .send_status(
                StatusLevel::Warning,
                "Hide policy applied but not saved: no usable configuration file",
            )
            .await;
        return;
    };

    // persist the updated selection so it is remembered across runs
    if let Err(error) = crate::config::save_config_to(&config, &config_path).await {
        log::error!("Failed to save hide policy: {error}");
        context
            .send_status(
                StatusLevel::Warning,
                format!("Hide policy applied but not saved: {error}"),
            )
            .await;
    }
}
