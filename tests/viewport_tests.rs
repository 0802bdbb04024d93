mod common;

use common::*;
use facility_map::prelude::*;

/// Camera arbitration driven by real search results
#[cfg(test)]
mod viewport_tests {
    use super::*;

    fn zoom_to_search() -> MapConfig {
        let mut config = MapConfig::default();
        config.viewport.zoom_to_search = true;
        config
    }

    #[tokio::test]
    async fn test_extent_fit_wins_over_pan_to_selection() {
        init_logging();
        let fetcher = StaticFetcher::default().with_page(
            "",
            page(
                vec![feature("inside", 5.0, 5.0), feature("outside", 50.0, 50.0)],
                2,
                Some([0.0, 0.0, 10.0, 10.0]),
                None,
            ),
        );
        let orchestrator = SearchOrchestrator::new(fetcher, 50);
        let mut controller =
            ViewportController::new(Viewport::default(), zoom_to_search().viewport);
        let mut disambiguator = ClusterDisambiguator::default();

        // Selection and a fresh extent land in the same pass
        let intent = disambiguator.select_facility("outside");
        controller.request(intent);
        let results = orchestrator.search(FilterState::default()).await.unwrap();

        let decided = controller.process(
            &ViewportSignals {
                collection: Some(&results),
                ..ViewportSignals::default()
            },
            &mut disambiguator,
        );

        assert_eq!(
            decided,
            ViewportIntent::FitToExtent(LatLngBounds::from_extent([0.0, 0.0, 10.0, 10.0]).unwrap())
        );
        assert_eq!(controller.surface().unwrap().center, LatLng::new(5.0, 5.0));
        assert_eq!(disambiguator.selected(), Some("outside"));
    }

    #[tokio::test]
    async fn test_single_result_fit_respects_zoom_cap() {
        init_logging();
        let fetcher = StaticFetcher::default().with_page(
            "q=one",
            page(
                vec![feature("only", 2.35, 48.85)],
                1,
                Some([2.35, 48.85, 2.35, 48.85]),
                None,
            ),
        );
        let mut session = MapSession::new(
            fetcher,
            Viewport::default(),
            MemoryHistory::new("/?q=one"),
            zoom_to_search(),
        );

        session.mount().await;

        let viewport = session.viewport().surface().unwrap();
        assert_eq!(viewport.center, LatLng::new(48.85, 2.35));
        assert_eq!(viewport.zoom, 15.0);
    }

    #[tokio::test]
    async fn test_reset_clears_group_and_restores_default_camera() {
        init_logging();
        let fetcher = StaticFetcher::default().with_page(
            "",
            page(
                vec![
                    feature("a", 90.4, 23.8),
                    feature("b", 90.4, 23.8),
                    feature("c", 77.2, 28.6),
                ],
                3,
                Some([77.2, 23.8, 90.4, 28.6]),
                None,
            ),
        );
        let mut session = MapSession::new(
            fetcher,
            Viewport::default(),
            MemoryHistory::default(),
            zoom_to_search(),
        );
        session.mount().await;

        let click = session.click_cluster(LatLng::new(23.8, 90.4), 18.0);
        assert!(matches!(click, ClusterClick::Disambiguate(ref group) if group.len() == 2));
        assert!(session.disambiguator().is_open());

        assert_eq!(session.reset(), ViewportIntent::ResetToDefault);
        assert!(session.disambiguator().open_group().is_none());

        let viewport = session.viewport().surface().unwrap();
        assert_eq!(viewport.center, LatLng::new(15.0, 0.0));
        assert_eq!(viewport.zoom, 2.0);
        assert_eq!(session.viewport().state(), &ControllerState::Idle);
    }

    #[tokio::test]
    async fn test_deep_link_centers_at_detail_zoom() {
        init_logging();
        let fetcher = StaticFetcher::default()
            .with_page(
                "q=mill",
                page(vec![feature("other", 10.0, 10.0)], 1, Some([10.0, 10.0, 10.0, 10.0]), None),
            )
            .with_detail(feature("US2020001", 2.5, 40.5));
        let mut session = MapSession::new(
            fetcher,
            Viewport::default(),
            MemoryHistory::new("/facilities/US2020001?q=mill"),
            zoom_to_search(),
        );

        let outcome = session.mount().await;
        assert_eq!(outcome.focus.as_deref(), Some("US2020001"));
        assert_eq!(session.viewport().state(), &ControllerState::Settled);

        let viewport = session.viewport().surface().unwrap();
        assert_eq!(viewport.center, LatLng::new(40.5, 2.5));
        assert_eq!(viewport.zoom, 15.0);
    }

    #[tokio::test]
    async fn test_selecting_visible_facility_keeps_camera() {
        init_logging();
        let fetcher = StaticFetcher::default().with_page(
            "",
            page(
                vec![feature("a", 1.0, 1.0), feature("b", 9.0, 9.0)],
                2,
                Some([1.0, 1.0, 9.0, 9.0]),
                None,
            ),
        );
        let mut session = MapSession::new(
            fetcher,
            Viewport::default(),
            MemoryHistory::default(),
            zoom_to_search(),
        );
        session.mount().await;
        let before = session.viewport().surface().unwrap().clone();

        assert_eq!(session.select_facility("b"), ViewportIntent::NoOp);
        assert_eq!(session.viewport().surface().unwrap(), &before);
        assert_eq!(session.disambiguator().selected(), Some("b"));
    }

    #[tokio::test]
    async fn test_leaving_facility_route_drops_pending_focus() {
        init_logging();
        let mut placeless = feature("X", 0.0, 0.0);
        placeless.coordinates = None;
        let fetcher = StaticFetcher::default()
            .with_page("", page(vec![feature("other", 1.0, 1.0)], 1, None, None))
            .with_page("q=b", page(vec![feature("X", 50.0, 50.0)], 1, None, None))
            .with_detail(placeless);
        let mut session = MapSession::new(
            fetcher,
            Viewport::default(),
            MemoryHistory::new("/facilities/X"),
            MapConfig::default(),
        );
        session.mount().await;
        assert_eq!(
            session.viewport().state(),
            &ControllerState::AwaitingDataForInitialFocus { id: "X".into() }
        );
        let before = session.viewport().surface().unwrap().clone();

        // The new results hold X, but the route no longer points at it
        session.history_mut().push("/?q=b");
        assert_eq!(session.on_navigation().await, ViewportIntent::NoOp);
        assert_eq!(session.viewport().state(), &ControllerState::Idle);
        assert_eq!(session.viewport().surface().unwrap(), &before);
    }

    #[tokio::test]
    async fn test_unknown_facility_route_does_not_wait_for_results() {
        init_logging();
        let fetcher = StaticFetcher::default()
            .with_page("", page(Vec::new(), 0, None, None))
            .with_page("q=b", page(vec![feature("X", 50.0, 50.0)], 1, None, None));
        let mut session = MapSession::new(
            fetcher,
            Viewport::default(),
            MemoryHistory::new("/facilities/X"),
            MapConfig::default(),
        );
        session.mount().await;
        assert_eq!(session.viewport().state(), &ControllerState::Idle);
        let before = session.viewport().surface().unwrap().clone();

        session.history_mut().push("/?q=b");
        assert_eq!(session.on_navigation().await, ViewportIntent::NoOp);
        assert_eq!(session.viewport().surface().unwrap(), &before);
    }

    #[tokio::test]
    async fn test_enabling_zoom_to_search_fits_loaded_results() {
        init_logging();
        let fetcher = StaticFetcher::default().with_page(
            "",
            page(vec![feature("a", 5.0, 5.0)], 1, Some([0.0, 0.0, 10.0, 10.0]), None),
        );
        let mut session = MapSession::new(
            fetcher,
            Viewport::default(),
            MemoryHistory::default(),
            MapConfig::default(),
        );
        session.mount().await;

        assert_eq!(
            session.set_zoom_to_search(true),
            ViewportIntent::FitToExtent(LatLngBounds::from_extent([0.0, 0.0, 10.0, 10.0]).unwrap())
        );
        assert_eq!(session.viewport().surface().unwrap().center, LatLng::new(5.0, 5.0));
    }
}
