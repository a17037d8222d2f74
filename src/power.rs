//! Power and art-mode control for scheduled use.
//!
//! `turn_on` brings the TV up into art mode (waking it over the network
//! when it has dropped off), `turn_off` puts it in standby, and
//! `set_art` only flips art mode. Each returns the outcome to print, or a
//! [`PowerError`] carrying the exit code for cron.

use crate::error::{PowerError, TvError};
use crate::tv::{ArtMode, ArtRemote, KEY_POWER};
use crate::wol::MacAddress;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const WAKE_POLL_INTERVAL: Duration = Duration::from_secs(1);
const WAKE_POLLS: u32 = 30;
const VERIFY_DELAY: Duration = Duration::from_secs(2);
const POWER_KEY_SETTLE: Duration = Duration::from_secs(5);
const POWER_OFF_SETTLE: Duration = Duration::from_secs(3);
const POWER_HOLD: Duration = Duration::from_secs(3);
const ART_WAKE_SETTLE: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerOutcome {
    AlreadyInArtMode,
    ArtModeEnabled,
    TurnedOnWithArtMode,
    TurnedOnUncertain,
    AlreadyOff,
    PoweredOff,
    Standby,
    AlreadyInNormalMode,
    ArtModeDisabled,
}

impl fmt::Display for PowerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AlreadyInArtMode => "TV already in art mode",
            Self::ArtModeEnabled => "Art mode enabled",
            Self::TurnedOnWithArtMode => "TV turned on with art mode",
            Self::TurnedOnUncertain => "TV turned on (art mode status uncertain)",
            Self::AlreadyOff => "TV already off",
            Self::PoweredOff => "TV powered off successfully",
            Self::Standby => "TV in standby mode",
            Self::AlreadyInNormalMode => "TV already in normal mode",
            Self::ArtModeDisabled => "Art mode disabled (TV remains on)",
        })
    }
}

/// Authorization and connection failures exit 2; anything else 3.
fn failure(e: TvError, what: &str) -> PowerError {
    if e.is_transport() || matches!(e, TvError::Unauthorized(_)) {
        PowerError::Connection(format!("{what}: {e}"))
    } else {
        PowerError::Failed(format!("{what}: {e}"))
    }
}

async fn wait_until_reachable<R: ArtRemote>(tv: &mut R) -> bool {
    for _ in 0..WAKE_POLLS {
        sleep(WAKE_POLL_INTERVAL).await;
        if tv.is_reachable(WAKE_POLL_INTERVAL).await {
            return true;
        }
    }
    false
}

/// `Some(true)` when in art mode, `None` when the TV would not say.
/// `-7` on a status request means art mode is already active.
async fn art_mode_status<R: ArtRemote>(tv: &mut R) -> Result<Option<bool>, PowerError> {
    match tv.art_mode().await {
        Ok(ArtMode::On) => Ok(Some(true)),
        Ok(ArtMode::Off) => Ok(Some(false)),
        Ok(ArtMode::Unknown(value)) => {
            tracing::debug!("Unrecognised art mode status: {}", value);
            Ok(None)
        }
        Err(e) if e.is_already_in_state() => Ok(Some(true)),
        Err(e @ TvError::Unauthorized(_)) => Err(failure(e, "Could not read art mode")),
        Err(e) => {
            tracing::debug!("Could not get art mode status: {}", e);
            Ok(None)
        }
    }
}

/// Request the art mode state and confirm it took.
async fn switch_art_mode<R: ArtRemote>(tv: &mut R, on: bool) -> Result<bool, PowerError> {
    match tv.set_art_mode(on).await {
        Ok(()) => {
            sleep(VERIFY_DELAY).await;
            Ok(art_mode_status(tv).await? == Some(on))
        }
        Err(e) if e.is_already_in_state() => {
            let state = art_mode_status(tv).await?;
            tracing::info!("TV answered -7; art mode now reads {:?}", state);
            Ok(true)
        }
        Err(e @ TvError::Unauthorized(_)) => Err(failure(e, "Could not set art mode")),
        Err(e) => {
            tracing::warn!("Failed to set art mode: {}", e);
            Ok(false)
        }
    }
}

/// Bring the TV up in art mode.
pub async fn turn_on<R, W>(tv: &mut R, mac: Option<MacAddress>, wake: W) -> Result<PowerOutcome, PowerError>
where
    R: ArtRemote,
    W: AsyncFnOnce(MacAddress) -> std::io::Result<()>,
{
    if !tv.is_reachable(PROBE_TIMEOUT).await {
        match mac {
            Some(mac) => {
                tracing::info!("TV not responding, sending Wake-on-LAN to {}...", mac);
                match wake(mac).await {
                    Ok(()) => {
                        if !wait_until_reachable(tv).await {
                            return Err(PowerError::Connection(format!(
                                "TV at {} did not respond after Wake-on-LAN",
                                tv.host()
                            )));
                        }
                        tracing::info!("TV is responding");
                    }
                    Err(e) => {
                        tracing::warn!("Wake-on-LAN failed: {}", e);
                        tracing::info!("Attempting direct power on without Wake-on-LAN");
                    }
                }
            }
            None => tracing::warn!("TV not responding and no MAC address known; trying anyway"),
        }
    }

    match art_mode_status(tv).await? {
        Some(true) => Ok(PowerOutcome::AlreadyInArtMode),
        Some(false) => {
            tracing::info!("TV is on, switching to art mode...");
            if switch_art_mode(tv, true).await? {
                Ok(PowerOutcome::ArtModeEnabled)
            } else {
                Err(PowerError::Failed("Failed to enable art mode".into()))
            }
        }
        None => {
            if !tv.is_reachable(PROBE_TIMEOUT).await {
                tracing::info!("Sending {}...", KEY_POWER);
                if let Err(e) = tv.send_key(KEY_POWER).await {
                    tracing::warn!("Could not send {}: {}", KEY_POWER, e);
                }
                sleep(POWER_KEY_SETTLE).await;
            }
            if switch_art_mode(tv, true).await? {
                Ok(PowerOutcome::TurnedOnWithArtMode)
            } else if tv.is_reachable(PROBE_TIMEOUT).await {
                Ok(PowerOutcome::TurnedOnUncertain)
            } else {
                Err(PowerError::Failed("Failed to turn on TV".into()))
            }
        }
    }
}

/// Put the TV into standby.
pub async fn turn_off<R: ArtRemote>(tv: &mut R) -> Result<PowerOutcome, PowerError> {
    if !tv.is_reachable(PROBE_TIMEOUT).await {
        return Ok(PowerOutcome::AlreadyOff);
    }

    tracing::info!("Sending {}...", KEY_POWER);
    if let Err(e) = tv.send_key(KEY_POWER).await {
        tracing::warn!("{} failed ({}), holding it instead", KEY_POWER, e);
        tv.hold_key(KEY_POWER, POWER_HOLD)
            .await
            .map_err(|e| failure(e, "Failed to send power off command"))?;
    }

    sleep(POWER_OFF_SETTLE).await;
    if tv.is_reachable(PROBE_TIMEOUT).await {
        Ok(PowerOutcome::Standby)
    } else {
        Ok(PowerOutcome::PoweredOff)
    }
}

/// Turn art mode on or off without touching power.
pub async fn set_art<R, W>(tv: &mut R, on: bool, mac: Option<MacAddress>, wake: W) -> Result<PowerOutcome, PowerError>
where
    R: ArtRemote,
    W: AsyncFnOnce(MacAddress) -> std::io::Result<()>,
{
    if let Some(mac) = mac {
        if !tv.is_reachable(PROBE_TIMEOUT).await {
            tracing::info!("TV not responding, sending Wake-on-LAN to {}...", mac);
            wake(mac)
                .await
                .map_err(|e| PowerError::Connection(format!("Wake-on-LAN failed: {e}")))?;
            sleep(ART_WAKE_SETTLE).await;
        }
    }

    match tv.set_art_mode(on).await {
        Ok(()) if on => Ok(PowerOutcome::ArtModeEnabled),
        Ok(()) => Ok(PowerOutcome::ArtModeDisabled),
        Err(e) if e.is_already_in_state() && on => Ok(PowerOutcome::AlreadyInArtMode),
        Err(e) if e.is_already_in_state() => Ok(PowerOutcome::AlreadyInNormalMode),
        Err(e) if on => Err(failure(e, "Failed to enable art mode")),
        Err(e) => Err(failure(e, "Failed to disable art mode")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tv::fake::{FakeTv, art_error};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    const MAC: MacAddress = MacAddress([0x64, 0x1c, 0xae, 0x01, 0x2b, 0xff]);

    async fn no_wake(_: MacAddress) -> std::io::Result<()> {
        panic!("Wake-on-LAN should not be sent");
    }

    #[tokio::test(start_paused = true)]
    async fn on_when_already_in_art_mode() {
        let mut tv = FakeTv::online();
        let outcome = turn_on(&mut tv, Some(MAC), no_wake).await.unwrap();
        assert_eq!(outcome, PowerOutcome::AlreadyInArtMode);
        assert_eq!(tv.called("set_art_mode:on"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn on_switches_art_mode() {
        let mut tv = FakeTv::online();
        tv.art_on = Some(false);
        let outcome = turn_on(&mut tv, None, no_wake).await.unwrap();
        assert_eq!(outcome, PowerOutcome::ArtModeEnabled);
        assert_eq!(outcome.to_string(), "Art mode enabled");
    }

    #[tokio::test(start_paused = true)]
    async fn on_wakes_sleeping_tv() {
        let woke = Cell::new(None);
        let mut tv = FakeTv::online();
        tv.reachable_script = [false, false].into();

        let outcome = turn_on(&mut tv, Some(MAC), async |mac| {
            woke.set(Some(mac));
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(woke.get(), Some(MAC));
        assert_eq!(outcome, PowerOutcome::AlreadyInArtMode);
        assert_eq!(tv.called("reachable"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn on_fails_when_wake_gets_no_answer() {
        let mut tv = FakeTv::online();
        tv.reachable = false;

        let err = turn_on(&mut tv, Some(MAC), async |_| Ok(())).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(tv.called("reachable"), 1 + WAKE_POLLS as usize);
    }

    #[tokio::test(start_paused = true)]
    async fn on_carries_on_when_wake_cannot_be_sent() {
        let mut tv = FakeTv::online();
        tv.reachable_script = [false].into();

        let outcome = turn_on(&mut tv, Some(MAC), async |_| {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no broadcast"))
        })
        .await
        .unwrap();

        assert_eq!(outcome, PowerOutcome::AlreadyInArtMode);
        assert_eq!(tv.called("reachable"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn on_treats_minus_seven_as_success() {
        let mut tv = FakeTv::online();
        tv.art_on = Some(false);
        tv.set_art_mode_errors = [art_error("set_artmode_status", "-7")].into();

        let outcome = turn_on(&mut tv, None, no_wake).await.unwrap();
        assert_eq!(outcome, PowerOutcome::ArtModeEnabled);
    }

    #[tokio::test(start_paused = true)]
    async fn on_reports_failure_to_enable() {
        let mut tv = FakeTv::online();
        tv.art_on = Some(false);
        tv.set_art_mode_errors = [art_error("set_artmode_status", "-1")].into();

        let err = turn_on(&mut tv, None, no_wake).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to enable art mode");
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn on_with_unknown_status_enables_art_mode() {
        let mut tv = FakeTv::online();
        tv.art_mode_errors = [art_error("get_artmode_status", "-1")].into();

        let outcome = turn_on(&mut tv, None, no_wake).await.unwrap();
        assert_eq!(outcome, PowerOutcome::TurnedOnWithArtMode);
        assert_eq!(tv.called("key:KEY_POWER"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn on_with_unknown_status_is_partial_success_when_reachable() {
        let mut tv = FakeTv::online();
        tv.art_on = None;
        tv.set_art_mode_errors = [art_error("set_artmode_status", "-1")].into();

        let outcome = turn_on(&mut tv, None, no_wake).await.unwrap();
        assert_eq!(outcome, PowerOutcome::TurnedOnUncertain);
    }

    #[tokio::test(start_paused = true)]
    async fn on_reports_unauthorized_as_connection_error() {
        let mut tv = FakeTv::online();
        tv.art_mode_errors = [TvError::Unauthorized("ms.channel.unauthorized".into())].into();

        let err = turn_on(&mut tv, None, no_wake).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn off_when_unreachable() {
        let mut tv = FakeTv::online();
        tv.reachable = false;
        assert_eq!(turn_off(&mut tv).await.unwrap(), PowerOutcome::AlreadyOff);
        assert!(tv.called("key:KEY_POWER") == 0);
    }

    #[tokio::test(start_paused = true)]
    async fn off_sends_power_key() {
        let mut tv = FakeTv::online();
        assert_eq!(turn_off(&mut tv).await.unwrap(), PowerOutcome::PoweredOff);
        assert_eq!(tv.called("key:KEY_POWER"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn off_reports_standby_when_still_reachable() {
        let mut tv = FakeTv::online();
        tv.reachable_script = [true, true].into();
        assert_eq!(turn_off(&mut tv).await.unwrap(), PowerOutcome::Standby);
    }

    #[tokio::test(start_paused = true)]
    async fn off_falls_back_to_holding_the_key() {
        let mut tv = FakeTv::online();
        tv.key_errors = [art_error("ms.remote.control", "-1")].into();

        assert_eq!(turn_off(&mut tv).await.unwrap(), PowerOutcome::PoweredOff);
        assert_eq!(tv.called("hold:KEY_POWER"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn off_fails_when_both_key_methods_fail() {
        let mut tv = FakeTv::online();
        tv.key_errors = [
            art_error("ms.remote.control", "-1"),
            art_error("ms.remote.control", "-1"),
        ]
        .into();

        let err = turn_off(&mut tv).await.unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().starts_with("Failed to send power off command"));
    }

    #[tokio::test(start_paused = true)]
    async fn art_toggle_messages() {
        let mut tv = FakeTv::online();
        assert_eq!(
            set_art(&mut tv, false, None, no_wake).await.unwrap(),
            PowerOutcome::ArtModeDisabled
        );
        assert_eq!(tv.art_on, Some(false));

        tv.set_art_mode_errors = [art_error("set_artmode_status", "-7")].into();
        assert_eq!(
            set_art(&mut tv, false, None, no_wake).await.unwrap(),
            PowerOutcome::AlreadyInNormalMode
        );

        tv.set_art_mode_errors = [art_error("set_artmode_status", "-7")].into();
        assert_eq!(
            set_art(&mut tv, true, None, no_wake).await.unwrap(),
            PowerOutcome::AlreadyInArtMode
        );
    }

    #[tokio::test(start_paused = true)]
    async fn art_toggle_wakes_unreachable_tv() {
        let woke = Cell::new(false);
        let mut tv = FakeTv::online();
        tv.reachable_script = [false].into();

        let outcome = set_art(&mut tv, true, Some(MAC), async |_| {
            woke.set(true);
            Ok(())
        })
        .await
        .unwrap();

        assert!(woke.get());
        assert_eq!(outcome, PowerOutcome::ArtModeEnabled);
    }

    #[tokio::test(start_paused = true)]
    async fn art_toggle_failure_is_exit_three() {
        let mut tv = FakeTv::online();
        tv.set_art_mode_errors = [art_error("set_artmode_status", "-1")].into();
        let err = set_art(&mut tv, true, None, no_wake).await.unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
