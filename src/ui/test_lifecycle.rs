//! End-to-end panel lifecycle through the application context and its scheduler

#[cfg(test)]
mod tests {
    use crate::app::PerakApp;
    use crate::audio::{AudioBackend, ClipId, PlayMusic};
    use crate::config::FrameworkConfig;
    use crate::error::Error;
    use crate::gfx::resources::{ResourceTable, Template};
    use crate::gfx::scene::SurfaceId;
    use crate::ui::{
        Args, InputEvent, Panel, PanelContext, PanelCore, PanelState, PanelType,
        PointerEventData, TouchType, TweenKind,
    };
    use cgmath::Vector2;
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Panel whose animation is picked by the first open parameter
    #[derive(Default)]
    struct BagPanel {
        core: PanelCore,
        async_loads: u32,
    }

    impl Panel for BagPanel {
        fn core(&self) -> &PanelCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut PanelCore {
            &mut self.core
        }

        fn set_params(&mut self, params: &Args) {
            if let Some(kind) = params.find::<TweenKind>() {
                self.core.tween.kind = *kind;
            }
        }

        fn on_async_load(&mut self, _ctx: &mut PanelContext<'_>) {
            self.async_loads += 1;
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[derive(Default)]
    struct MailPanel {
        core: PanelCore,
    }

    impl Panel for MailPanel {
        fn core(&self) -> &PanelCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut PanelCore {
            &mut self.core
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[derive(Default)]
    struct LoadingPanel {
        core: PanelCore,
    }

    impl Panel for LoadingPanel {
        fn core(&self) -> &PanelCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut PanelCore {
            &mut self.core
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[derive(Default)]
    struct RecordingBackend {
        played: Rc<RefCell<Vec<String>>>,
    }

    impl AudioBackend for RecordingBackend {
        fn load_clip(&self, path: &str) -> Option<ClipId> {
            Some(ClipId(path.len() as u64))
        }

        fn play_one_shot(&self, clip: ClipId) {
            self.played.borrow_mut().push(format!("shot:{}", clip.0));
        }

        fn play_music(&self, clip: ClipId, _volume: f32, _looping: bool) {
            self.played.borrow_mut().push(format!("music:{}", clip.0));
        }

        fn stop_music(&self) {
            self.played.borrow_mut().push("stop".to_string());
        }
    }

    fn resources() -> ResourceTable {
        ResourceTable::new()
            .with("Prefabs/UI/BagPanel", Template::new("BagPanel"))
            .with("Prefabs/UI/MailPanel", Template::new("MailPanel"))
            .with("Prefabs/UI/LoadingPanel", Template::new("LoadingPanel"))
            .with(
                "Prefabs/RootUI",
                Template::new("Canvas").with_child(Template::new("Container")),
            )
    }

    fn app() -> PerakApp {
        PerakApp::new(FrameworkConfig::default(), resources()).unwrap()
    }

    fn async_loads(app: &PerakApp) -> Option<u32> {
        app.stage()
            .ui()
            .and_then(|ui| ui.panel::<BagPanel>())
            .map(|panel| panel.async_loads)
    }

    fn click() -> InputEvent {
        InputEvent::Click(PointerEventData::click(Vector2::new(10.0, 20.0), 1))
    }

    #[test]
    fn test_open_is_synchronous_and_reopen_needs_no_load() {
        let mut app = app();
        app.open_panel::<BagPanel>(Args::new()).unwrap();
        assert!(app.is_resident::<BagPanel>());
        assert!(app.is_visible::<BagPanel>());

        let surface = app.surface_of::<BagPanel>();
        app.open_panel::<BagPanel>(Args::new()).unwrap();
        assert_eq!(app.surface_of::<BagPanel>(), surface);
        assert_eq!(app.stage().ui().map(|ui| ui.pending_len()), Some(0));
    }

    #[test]
    fn test_ui_root_template_is_used_when_present() {
        let mut app = app();
        app.open_panel::<BagPanel>(Args::new()).unwrap();

        let stage = app.stage();
        let root = stage.scene().find_by_tag("RootUI").unwrap();
        assert_eq!(stage.scene().name(root), Some("RootUI"));
        let container = stage.scene().find_child(root, "Container").unwrap();
        let surface = app.surface_of::<BagPanel>().unwrap();
        assert_eq!(stage.scene().get(surface).unwrap().parent(), Some(container));
    }

    #[test]
    fn test_sweep_destroys_hidden_panel_after_two_intervals() {
        let mut app = app();
        app.open_panel::<BagPanel>(Args::new()).unwrap();
        app.hide_panel::<BagPanel>().unwrap();
        assert_eq!(app.panel_state::<BagPanel>(), Some(PanelState::Hidden));

        app.tick(5.0).unwrap();
        assert!(app.is_resident::<BagPanel>());

        app.tick(5.0).unwrap();
        assert!(!app.is_resident::<BagPanel>());
        assert!(app.surface_of::<BagPanel>().is_none());
    }

    #[test]
    fn test_reopening_resets_the_destroy_timer() {
        let mut app = app();
        app.open_panel::<BagPanel>(Args::new()).unwrap();
        app.hide_panel::<BagPanel>().unwrap();
        app.tick(5.0).unwrap();

        app.open_panel::<BagPanel>(Args::new()).unwrap();
        app.hide_panel::<BagPanel>().unwrap();
        app.tick(5.0).unwrap();
        assert!(app.is_resident::<BagPanel>());
    }

    #[test]
    fn test_show_then_hide_settles_hidden_for_every_tween_kind() {
        let mut app = app();
        let kinds = [
            TweenKind::None,
            TweenKind::Move,
            TweenKind::LocalMove,
            TweenKind::Scale,
            TweenKind::Rotate,
            TweenKind::LocalMoveAndScale,
            TweenKind::LocalMoveAndRotate,
            TweenKind::ScaleAndRotate,
            TweenKind::LocalMoveAndScaleAndRotate,
        ];

        for kind in kinds {
            app.open_panel::<BagPanel>(Args::new().with(kind)).unwrap();
            for _ in 0..10 {
                app.tick(0.1).unwrap();
            }
            assert_eq!(app.panel_state::<BagPanel>(), Some(PanelState::Visible), "{kind:?}");

            app.hide_panel::<BagPanel>().unwrap();
            for _ in 0..10 {
                app.tick(0.1).unwrap();
            }
            assert_eq!(app.panel_state::<BagPanel>(), Some(PanelState::Hidden), "{kind:?}");
            assert!(!app.is_visible::<BagPanel>());

            assert!(app.destroy_panel::<BagPanel>().unwrap());
        }
    }

    #[test]
    fn test_register_panel_through_app() {
        let mut app = app();
        app.open_panel::<MailPanel>(Args::new()).unwrap();
        let container = app.surface_of::<MailPanel>().and_then(|mail| {
            app.stage().scene().get(mail).and_then(|surface| surface.parent())
        });

        let external = app.stage_mut().scene_mut().spawn("BagPanel", container);
        app.register_panel(external, BagPanel::default()).unwrap();
        assert_eq!(app.surface_of::<BagPanel>(), Some(external));
        assert!(app.is_visible::<BagPanel>());

        let duplicate = app.stage_mut().scene_mut().spawn("BagPanel", container);
        app.stage_mut().scene_mut().set_active(duplicate, false);
        let err = app.register_panel(duplicate, BagPanel::default()).unwrap_err();
        assert!(matches!(err, Error::AlreadyResident { panel: "BagPanel" }));
        assert_eq!(app.surface_of::<BagPanel>(), Some(external));
        assert!(!app.stage().scene().is_active(duplicate));
    }

    #[test]
    fn test_async_load_runs_one_tick_after_load() {
        let mut app = app();
        app.open_panel::<BagPanel>(Args::new()).unwrap();
        assert_eq!(async_loads(&app), Some(0));

        app.tick(0.016).unwrap();
        assert_eq!(async_loads(&app), Some(1));

        app.tick(0.016).unwrap();
        assert_eq!(async_loads(&app), Some(1));
    }

    #[test]
    fn test_async_load_skipped_when_hidden_first() {
        let mut app = app();
        app.open_panel::<BagPanel>(Args::new()).unwrap();
        app.hide_panel::<BagPanel>().unwrap();

        app.tick(0.016).unwrap();
        assert_eq!(async_loads(&app), Some(0));
    }

    #[test]
    fn test_only_latest_listener_fires() {
        let mut app = app();
        app.open_panel::<BagPanel>(Args::new()).unwrap();
        let button = app.surface_of::<BagPanel>().unwrap();

        let fired = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&fired);
        app.add_listener(
            button,
            TouchType::OnClick,
            move |_, _, _| first.borrow_mut().push("f1"),
            Args::new(),
        )
        .unwrap();
        let second = Rc::clone(&fired);
        app.add_listener(
            button,
            TouchType::OnClick,
            move |_, _, _| second.borrow_mut().push("f2"),
            Args::new(),
        )
        .unwrap();

        assert!(app.dispatch(button, &click()).unwrap());
        assert_eq!(*fired.borrow(), vec!["f2"]);
    }

    #[test]
    fn test_callback_commands_apply_before_dispatch_returns() {
        let mut app = app();
        app.open_panel::<BagPanel>(Args::new()).unwrap();
        let button = app.surface_of::<BagPanel>().unwrap();

        let commands = app.commands();
        app.add_listener(
            button,
            TouchType::OnClick,
            move |_, _, _| commands.open_panel::<MailPanel>(Args::new()),
            Args::new(),
        )
        .unwrap();

        app.dispatch(button, &click()).unwrap();
        assert!(app.is_visible::<MailPanel>());
        assert!(app.commands().is_empty());
    }

    #[test]
    fn test_click_plays_the_click_sound() {
        let played = Rc::new(RefCell::new(Vec::new()));
        let backend = RecordingBackend {
            played: Rc::clone(&played),
        };
        let mut app = app().with_audio_backend(backend);
        app.open_panel::<BagPanel>(Args::new()).unwrap();
        let button = app.surface_of::<BagPanel>().unwrap();
        app.add_listener(button, TouchType::OnClick, |_, _, _| {}, Args::new())
            .unwrap();

        app.dispatch(button, &click()).unwrap();
        let expected = format!("shot:{}", PlayMusic::ButtonClick.path().unwrap().len());
        assert_eq!(*played.borrow(), vec![expected]);
    }

    #[test]
    fn test_dispatch_without_listener_is_silent() {
        let mut app = app();
        app.open_panel::<BagPanel>(Args::new()).unwrap();
        let button = app.surface_of::<BagPanel>().unwrap();
        assert!(!app.dispatch(button, &click()).unwrap());

        let err = app.dispatch(SurfaceId(9_999), &click()).unwrap_err();
        assert_eq!(err, Error::UnknownSurface(SurfaceId(9_999)));
    }

    #[test]
    fn test_listeners_of_destroyed_surfaces_are_dropped() {
        let mut app = app();
        app.open_panel::<BagPanel>(Args::new()).unwrap();
        let button = app.surface_of::<BagPanel>().unwrap();
        app.add_listener(button, TouchType::OnClick, |_, _, _| {}, Args::new())
            .unwrap();
        assert_eq!(app.stage().listeners().len(), 1);

        app.destroy_panel::<BagPanel>().unwrap();
        app.tick(0.016).unwrap();
        assert!(app.stage().listeners().is_empty());
    }

    #[test]
    fn test_direct_scene_load_unloads_panels_but_keeps_managers() {
        let mut app = app();
        app.open_panel::<BagPanel>(Args::new()).unwrap();
        app.play_sound(PlayMusic::StartScene).unwrap();

        app.load_scene(None, "Battle").unwrap();
        assert!(!app.is_resident::<BagPanel>());
        {
            let stage = app.stage();
            assert!(stage.scene().find_by_name("DDOLGameManager").is_some());
            assert!(stage.audio().unwrap().current_bgm().is_none());
            assert_eq!(stage.scene_control().unwrap().current_scene(), Some("Battle"));
        }

        // The registry rebuilds its root on the next open.
        app.open_panel::<BagPanel>(Args::new()).unwrap();
        assert!(app.is_visible::<BagPanel>());
    }

    #[test]
    fn test_scene_load_behind_loading_panel() {
        let mut app = app();
        app.open_panel::<BagPanel>(Args::new()).unwrap();

        app.load_scene(Some(PanelType::of::<LoadingPanel>()), "Battle")
            .unwrap();
        assert!(app.is_visible::<LoadingPanel>());
        assert!(!app.is_visible::<BagPanel>());
        assert!(app.is_resident::<BagPanel>());
        assert_eq!(app.stage().prefs().get_string("NextSceneName"), Some("Battle"));
    }

    #[test]
    fn test_second_context_fails_loudly() {
        let first = app();
        let err = PerakApp::new(FrameworkConfig::default(), resources())
            .err()
            .unwrap();
        assert!(matches!(err, Error::SingletonReentry { .. }));

        drop(first);
        assert!(PerakApp::new(FrameworkConfig::default(), resources()).is_ok());
    }

    #[test]
    fn test_shutdown_stops_the_sweep() {
        let mut app = app();
        app.open_panel::<BagPanel>(Args::new()).unwrap();
        app.hide_panel::<BagPanel>().unwrap();

        app.shutdown();
        assert!(app.stage().audio().is_none());
        for _ in 0..4 {
            app.tick(5.0).unwrap();
        }
        assert!(app.is_resident::<BagPanel>());
    }

    #[test]
    fn test_missing_panel_resource_leaves_registry_usable() {
        let mut app = app();
        app.open_panels(
            &[PanelType::of::<BagPanel>(), PanelType::of::<UnknownPanel>()],
            false,
            Args::new(),
        )
        .unwrap();
        assert!(!app.is_resident::<UnknownPanel>());
        assert!(!app.is_resident::<BagPanel>());

        // The request left behind is served by the next load pass.
        app.open_panel::<MailPanel>(Args::new()).unwrap();
        assert!(app.is_visible::<MailPanel>());
        assert!(app.is_visible::<BagPanel>());
    }

    #[derive(Default)]
    struct UnknownPanel {
        core: PanelCore,
    }

    impl Panel for UnknownPanel {
        fn core(&self) -> &PanelCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut PanelCore {
            &mut self.core
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }
}
