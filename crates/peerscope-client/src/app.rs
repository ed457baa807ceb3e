use crate::cache::PeerInspectionCache;
use crate::dispatcher::{CommandDispatcher, TimerAction};
use crate::reconciler::StateReconciler;
use crate::surface::GraphSurface;
use peerscope_core::{Command, NetworkSnapshot, PeerId};

/// Operator intent from the control surface (console, buttons, whatever the
/// host wires up).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Step,
    Reset,
    Play,
    Pause,
}

/// Everything that can happen to the client, from any source. The session
/// loop serializes these; `AppContext::handle_event` is the only consumer.
#[derive(Debug)]
pub enum Event {
    SnapshotReceived(NetworkSnapshot),
    CommandRequested(Intent),
    SelectionChanged(PeerId),
    ConnectionClosed,
}

/// Side effects the runtime must carry out after a dispatch. Handling an
/// event never touches the network or spawns tasks directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SendCommand(Command),
    StartPlayback,
    StopPlayback,
    ShowDetails(String),
}

/// Explicit application context: one construction site for the surface,
/// reconciler, dispatcher and cache, passed by reference everywhere. Tests
/// build one around a `MemorySurface` and feed synthetic events.
pub struct AppContext<S: GraphSurface> {
    surface: S,
    reconciler: StateReconciler,
    dispatcher: CommandDispatcher,
    cache: PeerInspectionCache,
}

impl<S: GraphSurface> AppContext<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            reconciler: StateReconciler::new(),
            dispatcher: CommandDispatcher::new(),
            cache: PeerInspectionCache::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn cache(&self) -> &PeerInspectionCache {
        &self.cache
    }

    /// Single deterministic dispatch point for the whole client.
    pub fn handle_event(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::SnapshotReceived(snapshot) => {
                self.reconciler.apply(&mut self.surface, &snapshot);
                self.cache.replace(snapshot.peers_info);
                Vec::new()
            }
            Event::CommandRequested(intent) => self.handle_intent(intent),
            Event::SelectionChanged(peer_id) => {
                vec![Effect::ShowDetails(self.cache.describe(&peer_id))]
            }
            Event::ConnectionClosed => match self.dispatcher.connection_closed() {
                Some(TimerAction::Cancel) => vec![Effect::StopPlayback],
                _ => Vec::new(),
            },
        }
    }

    fn handle_intent(&mut self, intent: Intent) -> Vec<Effect> {
        match intent {
            Intent::Step => vec![Effect::SendCommand(Command::StepForward)],
            Intent::Reset => vec![Effect::SendCommand(Command::Reset)],
            Intent::Play => match self.dispatcher.play() {
                Some(TimerAction::Start) => vec![Effect::StartPlayback],
                _ => Vec::new(),
            },
            Intent::Pause => match self.dispatcher.pause() {
                Some(TimerAction::Cancel) => vec![Effect::StopPlayback],
                _ => Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::PlaybackState;
    use crate::surface::MemorySurface;
    use peerscope_core::decode_snapshot;

    fn context() -> AppContext<MemorySurface> {
        AppContext::new(MemorySurface::new())
    }

    fn snapshot_event(json: &str) -> Event {
        Event::SnapshotReceived(decode_snapshot(json).expect("snapshot"))
    }

    #[test]
    fn snapshot_updates_surface_and_cache_without_effects() {
        let mut ctx = context();
        let effects = ctx.handle_event(snapshot_event(
            r#"{
                "nodes": [{"id": "a", "label": "", "title": "", "group": "online"}],
                "edges": [],
                "peers_info": {"a": {"is_online": true, "storage": []}}
            }"#,
        ));

        assert!(effects.is_empty());
        assert!(ctx.surface().node("a").is_some());
        assert!(ctx.cache().lookup("a").is_some());
    }

    #[test]
    fn step_and_reset_emit_commands_without_state_change() {
        let mut ctx = context();
        assert_eq!(
            ctx.handle_event(Event::CommandRequested(Intent::Step)),
            vec![Effect::SendCommand(Command::StepForward)]
        );
        assert_eq!(
            ctx.handle_event(Event::CommandRequested(Intent::Reset)),
            vec![Effect::SendCommand(Command::Reset)]
        );
        assert_eq!(ctx.dispatcher().state(), PlaybackState::Paused);
    }

    #[test]
    fn double_play_starts_playback_once() {
        let mut ctx = context();
        assert_eq!(
            ctx.handle_event(Event::CommandRequested(Intent::Play)),
            vec![Effect::StartPlayback]
        );
        assert!(ctx
            .handle_event(Event::CommandRequested(Intent::Play))
            .is_empty());
    }

    #[test]
    fn connection_closed_stops_active_playback() {
        let mut ctx = context();
        ctx.handle_event(Event::CommandRequested(Intent::Play));
        assert_eq!(
            ctx.handle_event(Event::ConnectionClosed),
            vec![Effect::StopPlayback]
        );
        assert!(ctx.handle_event(Event::ConnectionClosed).is_empty());
    }

    #[test]
    fn selection_miss_produces_fallback_details() {
        let mut ctx = context();
        let effects = ctx.handle_event(Event::SelectionChanged("ghost".to_string()));
        assert_eq!(
            effects,
            vec![Effect::ShowDetails(
                "No details available for peer ghost.".to_string()
            )]
        );
    }
}
