use crate::app_state::AppState;
use crate::domain::RemoteLight;
use crate::domain::commands::{DeviceCommand, HubCommand};
use crate::lifecycle::crud::sync_devices;
use crate::lifecycle::payload::{AuthorizedApp, DeviceCommandsEvent, TimerEvent};
use crate::lifecycle::{LifecycleError, lifx_token, selected_lights};
use crate::lifx::{CommandPlan, full_event_list, map_command};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Pushes the current state of every light to its device and reconciles the device list.
#[instrument(skip_all, fields(installed_app_id = app.installed_app.installed_app_id, schedule = ?timer.name))]
pub async fn handle_scheduled_event(state: AppState, app: Arc<AuthorizedApp>, timer: TimerEvent) -> Result<(), LifecycleError> {
    let installed_app = &app.installed_app;
    let devices = state
        .hub
        .list_devices(&app.auth_token, &installed_app.location_id, &installed_app.installed_app_id)
        .await?;
    let Some(lights) = selected_lights(&state, installed_app).await? else {
        return Ok(());
    };

    info!("📡 Polled {} light(s)", lights.len());

    let hub = state.hub.as_ref();
    let auth_token = app.auth_token.as_str();
    let refreshes = lights.iter().filter_map(|light| {
        let device = devices.iter().find(|device| device.external_id == light.id)?;
        Some(async move {
            debug!(light_id = light.id, "Sending events for '{}'", light.label);
            if let Err(e) = hub.send_events(auth_token, &device.device_id, &full_event_list(light)).await {
                warn!(device_id = device.device_id, "⚠️ Unable to refresh '{}': {}", device.label, e);
            }
        })
    });

    futures::join!(join_all(refreshes), sync_devices(&state, &app, &lights, &devices));
    Ok(())
}

/// Forwards hub commands to the light and reports the resulting state back to the device.
#[instrument(skip_all, fields(installed_app_id = app.installed_app.installed_app_id, device_id = event.device_id))]
pub async fn handle_device_commands(state: AppState, app: Arc<AuthorizedApp>, event: DeviceCommandsEvent) -> Result<(), LifecycleError> {
    let installed_app = &app.installed_app;
    let token = lifx_token(&state, &installed_app.installed_app_id, &installed_app.config).await?;

    let commands = event.commands.iter().filter_map(parse_command).collect::<Vec<_>>();
    let results = join_all(
        commands
            .iter()
            .map(|command| execute_command(&state, &app.auth_token, &token, &event, command)),
    )
    .await;

    let failed = results.into_iter().filter(Result::is_err).count();
    if failed > 0 {
        warn!("⚠️ {} of {} command(s) failed", failed, commands.len());
    }
    Ok(())
}

fn parse_command(command: &HubCommand) -> Option<DeviceCommand> {
    DeviceCommand::try_from(command)
        .inspect_err(|e| {
            warn!(
                component = ?command.component_id,
                capability = ?command.capability,
                "⚠️ Ignoring command: {}",
                e
            )
        })
        .ok()
}

async fn execute_command(
    state: &AppState,
    auth_token: &str,
    lifx_token: &str,
    event: &DeviceCommandsEvent,
    command: &DeviceCommand,
) -> Result<(), LifecycleError> {
    let events = match map_command(command) {
        CommandPlan::Update { request, events } => {
            state.lifx.set_state(lifx_token, &event.external_id, &request).await?;
            events
        }
        CommandPlan::Refresh => full_event_list(&fetch_light(state, lifx_token, &event.external_id).await?),
    };

    state
        .hub
        .send_events(auth_token, &event.device_id, &events)
        .await
        .inspect_err(|e| warn!(?command, "⚠️ Unable to report the state after the command: {}", e))?;
    debug!(?command, "Executed command");
    Ok(())
}

async fn fetch_light(state: &AppState, lifx_token: &str, light_id: &str) -> Result<RemoteLight, LifecycleError> {
    state
        .lifx
        .get_light(lifx_token, light_id)
        .await
        .inspect_err(|e| warn!(light_id, "⚠️ Unable to read light: {}", e))?
        .ok_or_else(|| LifecycleError::UnknownLight(light_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AttributeEvent, InstalledAppConfig, LIFX_ACCESS_TOKEN, Power};
    use crate::fakes::{FakeHub, FakeLifx, HubCall, LifxCall, local_device, remote_light};
    use crate::lifecycle::payload::InstalledApp;
    use crate::lifecycle::test_support::default_harness;
    use crate::lifx::domain::LightStateUpdate;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_log::test;

    fn app(config: InstalledAppConfig) -> Arc<AuthorizedApp> {
        Arc::new(AuthorizedApp {
            auth_token: "auth-token".to_string(),
            installed_app: InstalledApp {
                installed_app_id: "app-1".to_string(),
                location_id: "st-location-1".to_string(),
                config,
            },
        })
    }

    fn configured_app() -> Arc<AuthorizedApp> {
        app(InstalledAppConfig::default()
            .with_string(LIFX_ACCESS_TOKEN, "personal-token")
            .with_string("lifxLocationId", "location-1"))
    }

    fn poll() -> TimerEvent {
        TimerEvent {
            name: Some("poll".to_string()),
        }
    }

    fn commands_event(external_id: &str, commands: serde_json::Value) -> DeviceCommandsEvent {
        DeviceCommandsEvent {
            device_id: format!("device-{}", external_id),
            external_id: external_id.to_string(),
            commands: serde_json::from_value(commands).unwrap(),
        }
    }

    fn send_events_calls(hub: &FakeHub) -> Vec<HubCall> {
        hub.calls()
            .into_iter()
            .filter(|call| matches!(call, HubCall::SendEvents { .. }))
            .collect()
    }

    #[test(tokio::test)]
    async fn the_poll_refreshes_known_devices_and_reconciles() -> Result<(), LifecycleError> {
        let harness = default_harness(
            FakeLifx::with_lights(vec![remote_light("A"), remote_light("B")]),
            FakeHub::with_devices(vec![local_device("B"), local_device("C")]),
        );

        handle_scheduled_event(harness.state.clone(), configured_app(), poll()).await?;

        let calls = harness.hub.calls();
        assert!(calls.contains(&HubCall::SendEvents {
            device_id: "device-B".to_string(),
            events: full_event_list(&remote_light("B")),
        }));
        assert!(calls.contains(&HubCall::CreateDevice {
            external_id: "A".to_string(),
            label: "Light A".to_string(),
            profile_id: "profile-id".to_string(),
        }));
        assert!(calls.contains(&HubCall::SendEvents {
            device_id: "device-A".to_string(),
            events: full_event_list(&remote_light("A")),
        }));
        assert!(calls.contains(&HubCall::DeleteDevice {
            device_id: "device-C".to_string(),
        }));
        assert_eq!(send_events_calls(&harness.hub).len(), 2);
        Ok(())
    }

    #[test(tokio::test)]
    async fn a_failing_refresh_does_not_stop_the_others() -> Result<(), LifecycleError> {
        let harness = default_harness(
            FakeLifx::with_lights(vec![remote_light("A"), remote_light("B")]),
            FakeHub::with_devices(vec![local_device("A"), local_device("B")]).failing_for("device-A"),
        );

        handle_scheduled_event(harness.state.clone(), configured_app(), poll()).await?;

        assert_eq!(send_events_calls(&harness.hub).len(), 2);
        Ok(())
    }

    #[test(tokio::test)]
    async fn the_poll_without_a_location_only_lists_devices() -> Result<(), LifecycleError> {
        let harness = default_harness(FakeLifx::with_lights(vec![remote_light("A")]), FakeHub::default());
        let app = app(InstalledAppConfig::default().with_string(LIFX_ACCESS_TOKEN, "personal-token"));

        handle_scheduled_event(harness.state.clone(), app, poll()).await?;

        assert_eq!(
            harness.hub.calls(),
            vec![HubCall::ListDevices {
                auth_token: "auth-token".to_string(),
                location_id: "st-location-1".to_string(),
            }]
        );
        assert!(harness.lifx.calls().is_empty());
        Ok(())
    }

    #[test(tokio::test)]
    async fn commands_update_the_light_and_report_the_new_state() -> Result<(), LifecycleError> {
        let harness = default_harness(FakeLifx::with_lights(vec![remote_light("A")]), FakeHub::default());
        let event = commands_event(
            "A",
            json!([
                { "componentId": "main", "capability": "switch", "command": "off", "arguments": [] },
                { "componentId": "main", "capability": "colorControl", "command": "setHue", "arguments": [50] }
            ]),
        );

        handle_device_commands(harness.state.clone(), configured_app(), event).await?;

        let lifx_calls = harness.lifx.calls();
        assert!(lifx_calls.contains(&LifxCall::SetState {
            token: "personal-token".to_string(),
            light_id: "A".to_string(),
            update: LightStateUpdate::power(Power::Off),
        }));
        assert!(lifx_calls.contains(&LifxCall::SetState {
            token: "personal-token".to_string(),
            light_id: "A".to_string(),
            update: LightStateUpdate::color("hue:180".to_string()),
        }));

        let hub_calls = harness.hub.calls();
        assert!(hub_calls.contains(&HubCall::SendEvents {
            device_id: "device-A".to_string(),
            events: vec![AttributeEvent::switch("off")],
        }));
        assert!(hub_calls.contains(&HubCall::SendEvents {
            device_id: "device-A".to_string(),
            events: vec![AttributeEvent::switch("on"), AttributeEvent::hue(50.0)],
        }));
        Ok(())
    }

    #[test(tokio::test)]
    async fn invalid_commands_are_skipped() -> Result<(), LifecycleError> {
        let harness = default_harness(FakeLifx::with_lights(vec![remote_light("A")]), FakeHub::default());
        let event = commands_event(
            "A",
            json!([
                { "command": "setColorLoop", "arguments": [] },
                { "command": "setLevel", "arguments": [] },
                { "command": "on", "arguments": [] }
            ]),
        );

        handle_device_commands(harness.state.clone(), configured_app(), event).await?;

        assert_eq!(
            harness.lifx.calls(),
            vec![LifxCall::SetState {
                token: "personal-token".to_string(),
                light_id: "A".to_string(),
                update: LightStateUpdate::power(Power::On),
            }]
        );
        assert_eq!(send_events_calls(&harness.hub).len(), 1);
        Ok(())
    }

    #[test(tokio::test)]
    async fn a_failed_light_update_reports_nothing() -> Result<(), LifecycleError> {
        let harness = default_harness(FakeLifx::with_lights(vec![remote_light("A")]).failing_for("A"), FakeHub::default());
        let event = commands_event("A", json!([{ "command": "on", "arguments": [] }]));

        handle_device_commands(harness.state.clone(), configured_app(), event).await?;

        assert!(harness.hub.calls().is_empty());
        Ok(())
    }

    #[test(tokio::test)]
    async fn refresh_reports_the_full_light_state() -> Result<(), LifecycleError> {
        let harness = default_harness(FakeLifx::with_lights(vec![remote_light("A")]), FakeHub::default());
        let event = commands_event("A", json!([{ "command": "refresh", "arguments": [] }]));

        handle_device_commands(harness.state.clone(), configured_app(), event).await?;

        assert_eq!(
            harness.lifx.calls(),
            vec![LifxCall::GetLight {
                token: "personal-token".to_string(),
                light_id: "A".to_string(),
            }]
        );
        assert_eq!(
            harness.hub.calls(),
            vec![HubCall::SendEvents {
                device_id: "device-A".to_string(),
                events: full_event_list(&remote_light("A")),
            }]
        );
        Ok(())
    }

    #[test(tokio::test)]
    async fn refreshing_an_unknown_light_reports_nothing() -> Result<(), LifecycleError> {
        let harness = default_harness(FakeLifx::default(), FakeHub::default());
        let event = commands_event("A", json!([{ "command": "refresh", "arguments": [] }]));

        handle_device_commands(harness.state.clone(), configured_app(), event).await?;

        assert!(harness.hub.calls().is_empty());
        Ok(())
    }

    #[test(tokio::test)]
    async fn commands_without_a_token_fail() {
        let harness = default_harness(FakeLifx::with_lights(vec![remote_light("A")]), FakeHub::default());
        let event = commands_event("A", json!([{ "command": "on", "arguments": [] }]));

        let result = handle_device_commands(harness.state.clone(), app(InstalledAppConfig::default()), event).await;

        assert!(matches!(result, Err(LifecycleError::MissingToken(_))));
        assert!(harness.lifx.calls().is_empty());
    }
}
