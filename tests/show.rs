mod tests {
    use dodeca_light_composer::arena::POOL_ALLOC_SIZE;
    use dodeca_light_composer::layout::TOTAL_LEDS;
    use dodeca_light_composer::{
        Duration, EffectId, FIXHALF, FIXMAX, FrameScheduler, Instant, OutputDriver, Rgb, Show,
        ShowClock, ShowConfig,
    };

    /// Counts frames and keeps the last one
    #[derive(Default)]
    struct RecordingDriver {
        writes: usize,
        last: Vec<Rgb>,
    }

    impl OutputDriver for RecordingDriver {
        fn write(&mut self, colors: &[Rgb]) {
            self.writes += 1;
            self.last = colors.to_vec();
        }
    }

    fn seeded() -> fastrand::Rng {
        fastrand::Rng::with_seed(42)
    }

    #[test]
    fn test_clock_age() {
        let clock = ShowClock::new(Instant::from_secs(10), Duration::from_secs(60));
        assert_eq!(clock.age(Instant::from_secs(10)), 0);
        assert_eq!(clock.age(Instant::from_secs(40)), FIXHALF);
        assert_eq!(clock.age(Instant::from_secs(70)), FIXMAX);
        assert_eq!(clock.age(Instant::from_secs(500)), FIXMAX);
        assert_eq!(clock.age(Instant::from_secs(3)), 0);
    }

    #[test]
    fn test_clock_zero_duration_is_over() {
        let clock = ShowClock::new(Instant::from_secs(1), Duration::from_ticks(0));
        assert_eq!(clock.age(Instant::from_secs(1)), FIXMAX);
    }

    #[test]
    fn test_show_starts_idle() {
        let mut show: Show = Show::new();
        let mut frame = [Rgb { r: 3, g: 3, b: 3 }; TOTAL_LEDS];
        assert!(show.effect().is_idle());
        assert!(!show.update(Instant::from_secs(0), &mut seeded(), &mut frame[..]));
        assert!(frame.iter().all(|&pixel| pixel == Rgb::default()));
    }

    #[test]
    fn test_show_start_reserves_footprint() {
        let mut rng = seeded();
        let mut show: Show = Show::new();
        for id in EffectId::ALL {
            let config = ShowConfig::new(id).with_duration(Duration::from_secs(10));
            show.start(&config, Instant::from_secs(5), &mut rng).unwrap();
            assert_eq!(show.effect_id(), Some(id));
            let region = show.region().unwrap();
            assert_eq!(region.offset(), 0);
            assert!(region.len() >= id.footprint());
            assert_eq!(show.arena().used(), region.len());
            assert_eq!(show.clock().start(), Instant::from_secs(5));
            assert_eq!(show.clock().duration(), Duration::from_secs(10));
        }
    }

    #[test]
    fn test_show_runs_until_duration() {
        let mut rng = seeded();
        let mut frame = [Rgb::default(); TOTAL_LEDS];
        let mut show: Show = Show::new();
        let config = ShowConfig::new(EffectId::Comet).with_duration(Duration::from_secs(2));
        show.start(&config, Instant::from_secs(0), &mut rng).unwrap();
        assert!(show.update(Instant::from_millis(500), &mut rng, &mut frame[..]));
        assert!(show.update(Instant::from_millis(1999), &mut rng, &mut frame[..]));
        assert!(!show.update(Instant::from_secs(2), &mut rng, &mut frame[..]));
    }

    #[test]
    fn test_show_too_large_for_arena_stays_idle() {
        let mut rng = seeded();
        let mut frame = [Rgb { r: 7, g: 7, b: 7 }; TOTAL_LEDS];
        let mut show: Show<64> = Show::new();
        let error = show
            .start(&ShowConfig::new(EffectId::Spots), Instant::from_secs(0), &mut rng)
            .unwrap_err();
        assert_eq!(error.remaining, 64);
        assert!(error.requested >= EffectId::Spots.footprint());
        assert!(show.effect().is_idle());
        assert_eq!(show.region(), None);
        assert!(!show.update(Instant::from_secs(1), &mut rng, &mut frame[..]));
        assert!(frame.iter().all(|&pixel| pixel == Rgb::default()));
    }

    #[test]
    fn test_restart_releases_previous_show() {
        let mut rng = seeded();
        let mut show: Show = Show::new();
        show.start(&ShowConfig::new(EffectId::Cars), Instant::from_secs(0), &mut rng)
            .unwrap();
        let first = show.region().unwrap();
        show.start(&ShowConfig::new(EffectId::Diffusion), Instant::from_secs(60), &mut rng)
            .unwrap();
        let second = show.region().unwrap();
        assert_ne!(first, second);
        assert!(!show.arena().is_live(first));
        assert_eq!(second.offset(), 0);
    }

    #[test]
    fn test_footprints_fit_default_arena() {
        for id in EffectId::ALL {
            assert!(id.footprint() <= POOL_ALLOC_SIZE, "{}", id.as_str());
        }
    }

    #[test]
    fn test_scheduler_writes_every_tick() {
        let frame_duration = Duration::from_millis(10);
        let mut scheduler: FrameScheduler<_, _> =
            FrameScheduler::with_frame_duration(RecordingDriver::default(), seeded(), frame_duration);
        let config = ShowConfig::new(EffectId::Diffusion).with_duration(Duration::from_secs(1));
        scheduler.start_show(&config, Instant::from_millis(0)).unwrap();

        let result = scheduler.tick(Instant::from_millis(0));
        assert!(result.running);
        assert_eq!(result.next_deadline, Instant::from_millis(10));
        assert_eq!(result.sleep_duration, Duration::from_millis(10));

        let result = scheduler.tick(Instant::from_millis(14));
        assert_eq!(result.next_deadline, Instant::from_millis(20));
        assert_eq!(result.sleep_duration, Duration::from_millis(6));

        assert_eq!(scheduler.output().writes, 2);
        assert_eq!(scheduler.output().last.len(), TOTAL_LEDS);
        assert_eq!(scheduler.output().last, scheduler.frame());
    }

    #[test]
    fn test_scheduler_resets_after_stall() {
        let frame_duration = Duration::from_millis(10);
        let mut scheduler: FrameScheduler<_, _> =
            FrameScheduler::with_frame_duration(RecordingDriver::default(), seeded(), frame_duration);
        scheduler
            .start_show(&ShowConfig::new(EffectId::Cars), Instant::from_millis(0))
            .unwrap();
        scheduler.tick(Instant::from_millis(0));

        let result = scheduler.tick(Instant::from_millis(500));
        assert_eq!(result.next_deadline, Instant::from_millis(510));
        assert_eq!(result.sleep_duration, Duration::from_millis(10));
    }

    #[test]
    fn test_scheduler_reports_finished_show() {
        let mut scheduler: FrameScheduler<_, _> =
            FrameScheduler::new(RecordingDriver::default(), seeded());
        let config = ShowConfig::new(EffectId::Spots).with_duration(Duration::from_millis(100));
        scheduler.start_show(&config, Instant::from_millis(0)).unwrap();
        assert!(scheduler.tick(Instant::from_millis(50)).running);
        assert!(!scheduler.tick(Instant::from_millis(150)).running);
        assert_eq!(scheduler.show().effect_id(), Some(EffectId::Spots));
    }
}
