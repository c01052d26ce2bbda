mod tests {
    use dodeca_light_composer::color::Rgb;
    use dodeca_light_composer::effect::{
        Car, CarEffect, Comet, CometEffect, DiffusionEffect, Effect, EffectSlot, FrameContext,
        FIELD_MAX, FIELD_MIN, INITIAL_FIELD, MAX_ACTIVE_SPOTS, SpotEffect, TurnPlan,
    };
    use dodeca_light_composer::fixed::{FIXMAX, Fixed, pixels_to_fpixels};
    use dodeca_light_composer::graph::{DirectedEdge, Turn};
    use dodeca_light_composer::layout::{LEDS_PER_EDGE, TOTAL_LEDS};
    use dodeca_light_composer::random::RandomSource;

    const TICKS: u32 = 400;

    /// Always returns the smallest value, so every turn is a left turn
    struct ZeroRng;

    impl RandomSource for ZeroRng {
        fn random(&mut self, _bound: u32) -> u32 {
            0
        }
    }

    fn seeded() -> fastrand::Rng {
        fastrand::Rng::with_seed(0x00D0_DECA)
    }

    fn tick<E: Effect>(effect: &mut E, age: Fixed, rng: &mut fastrand::Rng, frame: &mut [Rgb]) -> bool {
        let mut ctx = FrameContext::new(age, rng, frame);
        effect.update(&mut ctx)
    }

    fn age_at(step: u32) -> Fixed {
        (step * u32::from(FIXMAX) / TICKS) as Fixed
    }

    #[test]
    fn test_comet_pool_count_stays_consistent() {
        let mut rng = seeded();
        let mut frame = [Rgb::default(); TOTAL_LEDS];
        let mut effect = CometEffect::new();
        effect.initialize_show(&mut rng);
        for step in 0..=TICKS {
            let running = tick(&mut effect, age_at(step), &mut rng, &mut frame);
            assert_eq!(running, step < TICKS);
            assert_eq!(effect.comets().active_count(), effect.comets().count_active());
        }
    }

    #[test]
    fn test_comets_spawn_up_to_target() {
        let mut rng = seeded();
        let mut frame = [Rgb::default(); TOTAL_LEDS];
        let mut effect = CometEffect::new();
        effect.initialize_show(&mut rng);
        tick(&mut effect, 0, &mut rng, &mut frame);
        assert_eq!(effect.comets().active_count(), 2);
    }

    #[test]
    fn test_comet_retired_the_tick_after_crossing() {
        const SPEED: u32 = 3000;
        let crossing = u32::from(FIXMAX).div_ceil(SPEED);

        let mut rng = seeded();
        let mut frame = [Rgb::default(); TOTAL_LEDS];
        let mut effect = CometEffect::new();
        effect.initialize_show(&mut rng);
        let comet = Comet::new(DirectedEdge::new(7, false), SPEED, 6, 1000);
        effect.launch(&mut rng, comet).unwrap();

        for step in 1..=crossing {
            tick(&mut effect, FIXMAX, &mut rng, &mut frame);
            assert_eq!(effect.comets().active_count(), 1, "tick {step}");
            let (_, comet) = effect.comets().iter_active().next().unwrap();
            assert_eq!(comet.travel, step * SPEED);
            assert_eq!(comet.travel > u32::from(FIXMAX), step == crossing);
        }

        tick(&mut effect, FIXMAX, &mut rng, &mut frame);
        assert_eq!(effect.comets().active_count(), 0);
    }

    #[test]
    fn test_comet_lights_its_edge() {
        let mut rng = seeded();
        let mut frame = [Rgb::default(); TOTAL_LEDS];
        let mut effect = CometEffect::new();
        effect.initialize_show(&mut rng);
        let path = DirectedEdge::new(12, true);
        effect.launch(&mut rng, Comet { travel: 16000, ..Comet::new(path, 100, 8, 0) }).unwrap();

        tick(&mut effect, FIXMAX, &mut rng, &mut frame);
        let lit = (0..LEDS_PER_EDGE).filter(|&offset| frame[path.led(offset)] != Rgb::default());
        assert!(lit.count() >= 6);
        let first_other_edge = DirectedEdge::new(13, false).led(0);
        assert_eq!(frame[first_other_edge], Rgb::default());
    }

    #[test]
    fn test_turn_plan_rotates() {
        let mut plan = TurnPlan::new([Turn::Left, Turn::Right, Turn::Right]);
        assert_eq!(plan.take(Turn::Left), Some(Turn::Left));
        assert_eq!(plan.iter().collect::<Vec<_>>(), [Turn::Right, Turn::Right, Turn::Left]);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn test_left_turning_car_repeats_its_cycle() {
        let edge_length = pixels_to_fpixels(LEDS_PER_EDGE as i32);
        let drive = || {
            let mut rng = ZeroRng;
            let plan = TurnPlan::new([Turn::Left; 3]);
            let mut car = Car::new(DirectedEdge::new(0, false), 20, plan, 0);
            let mut visited = Vec::new();
            for _ in 0..10 {
                car.advance(edge_length, &mut rng);
                visited.push(car.path);
                assert!(car.plan.iter().all(|turn| turn == Turn::Left));
            }
            visited
        };

        let visited = drive();
        let cycle: Vec<_> = [(1, false), (29, true), (26, true), (25, true), (0, false)]
            .into_iter()
            .map(|(edge, backward)| DirectedEdge::new(edge, backward))
            .collect();
        assert_eq!(visited[..5], cycle[..]);
        assert_eq!(visited[5..], cycle[..]);
        assert_eq!(drive(), visited);
    }

    #[test]
    fn test_car_stays_on_edge_until_crossing() {
        let mut rng = ZeroRng;
        let mut car = Car::new(DirectedEdge::new(4, false), 20, TurnPlan::new([Turn::Right; 3]), 0);
        car.advance(1000, &mut rng);
        assert_eq!(car.path, DirectedEdge::new(4, false));
        car.advance(1000, &mut rng);
        assert_eq!(car.path, DirectedEdge::new(9, true));
        assert_eq!(car.position, 80);
        assert_eq!(car.plan.iter().collect::<Vec<_>>(), [Turn::Right, Turn::Right, Turn::Left]);
    }

    #[test]
    fn test_car_pool_count_stays_consistent() {
        let mut rng = seeded();
        let mut frame = [Rgb::default(); TOTAL_LEDS];
        let mut effect = CarEffect::new();
        effect.initialize_show(&mut rng);
        for step in 0..=TICKS {
            tick(&mut effect, age_at(step), &mut rng, &mut frame);
            let cars = effect.cars();
            assert_eq!(cars.active_count(), cars.count_active());
            assert!(cars.active_count() >= 2 && cars.active_count() <= 5);
        }
    }

    #[test]
    fn test_cars_retire_when_worn_out() {
        let mut rng = seeded();
        let mut frame = [Rgb::default(); TOTAL_LEDS];
        let mut effect = CarEffect::new();
        effect.initialize_show(&mut rng);
        let plan = TurnPlan::new([Turn::Left; 3]);
        let index = effect
            .launch(&mut rng, Car::new(DirectedEdge::new(0, false), 20, plan, u32::from(FIXMAX)))
            .unwrap();

        tick(&mut effect, FIXMAX / 2, &mut rng, &mut frame);
        tick(&mut effect, FIXMAX / 2, &mut rng, &mut frame);
        let worn = effect.cars().get(index).unwrap();
        assert_eq!(worn.life, 2 * u32::from(FIXMAX));

        tick(&mut effect, FIXMAX / 2, &mut rng, &mut frame);
        let replaced = effect.cars().get(index).map_or(0, |car| car.life);
        assert!(replaced <= u32::from(FIXMAX), "{replaced}");
    }

    #[test]
    fn test_spot_counters_stay_consistent() {
        let mut rng = seeded();
        let mut frame = [Rgb::default(); TOTAL_LEDS];
        let mut effect = SpotEffect::new();
        effect.initialize_show(&mut rng);
        for step in 0..=TICKS {
            tick(&mut effect, age_at(step), &mut rng, &mut frame);
            let spots = effect.spots();
            assert_eq!(spots.active_count(), spots.count_active());
            assert_eq!(effect.total_active(), spots.active_count());
            assert!(spots.active_count() <= MAX_ACTIVE_SPOTS + 1);
        }
    }

    #[test]
    fn test_spots_dark_at_show_start() {
        let mut rng = seeded();
        let mut frame = [Rgb { r: 1, g: 1, b: 1 }; TOTAL_LEDS];
        let mut effect = SpotEffect::new();
        effect.initialize_show(&mut rng);
        assert!(tick(&mut effect, 0, &mut rng, &mut frame));
        assert_eq!(effect.spots().active_count(), 0);
        assert!(frame.iter().all(|&pixel| pixel == Rgb::default()));
    }

    #[test]
    fn test_spots_light_up_in_busy_phase() {
        let mut rng = seeded();
        let mut frame = [Rgb::default(); TOTAL_LEDS];
        let mut effect = SpotEffect::new();
        effect.initialize_show(&mut rng);
        let busy = (5 * u32::from(FIXMAX) / 7 + 1) as Fixed;
        tick(&mut effect, busy, &mut rng, &mut frame);
        assert!(effect.total_active() > 0);
        assert!(!tick(&mut effect, FIXMAX, &mut rng, &mut frame));
    }

    #[test]
    fn test_uniform_field_is_stable_without_drain() {
        let mut effect = DiffusionEffect::new();
        effect.step(0, 0);
        assert!(effect.field().iter().all(|&value| value == INITIAL_FIELD));
    }

    #[test]
    fn test_field_mean_never_increases() {
        let mut effect = DiffusionEffect::new();
        effect.step(0, 20);
        let mut previous: i64 = effect.field().iter().map(|&value| i64::from(value)).sum();
        for round in 0..200 {
            effect.step(if round % 2 == 0 { 0 } else { 3 }, 0);
            let total: i64 = effect.field().iter().map(|&value| i64::from(value)).sum();
            assert!(total <= previous, "round {round}: {previous} -> {total}");
            previous = total;
        }
    }

    #[test]
    fn test_forcing_pulls_focal_pentagon_down() {
        let mut effect = DiffusionEffect::new();
        effect.step(0, 20);
        let focal = DirectedEdge::new(effect.focal_edge(), false);
        assert_eq!(effect.field()[focal.led(14)], INITIAL_FIELD - 20);
        assert_eq!(effect.field()[focal.led(15)], INITIAL_FIELD - 20);
        assert_eq!(effect.field()[focal.led(0)], INITIAL_FIELD);
    }

    #[test]
    fn test_drained_field_rests_at_floor() {
        let mut effect = DiffusionEffect::new();
        effect.fill(i32::MIN);
        assert!(effect.field().iter().all(|&value| value == FIELD_MIN));

        effect.fill(FIELD_MIN + 2);
        for _ in 0..3 {
            effect.step(100, 100);
            assert!(effect.field().iter().all(|&value| value == FIELD_MIN));
        }

        effect.fill(i32::MAX);
        effect.step(0, 0);
        assert!(effect.field().iter().all(|&value| value == FIELD_MAX));
    }

    #[test]
    fn test_palette_index_wraps() {
        assert_eq!(DiffusionEffect::palette_index(1000), 4000);
        assert_eq!(DiffusionEffect::palette_index(8192), 0);
        assert_eq!(DiffusionEffect::palette_index(-1), 32764);
    }

    #[test]
    fn test_diffusion_runs_whole_show() {
        let mut rng = seeded();
        let mut frame = [Rgb::default(); TOTAL_LEDS];
        let mut effect = DiffusionEffect::new();
        effect.initialize_show(&mut rng);
        assert_eq!(effect.focal_edge() % 6, 4);
        for step in 0..=TICKS {
            let running = tick(&mut effect, age_at(step), &mut rng, &mut frame);
            assert_eq!(running, step < TICKS);
        }
    }

    #[test]
    fn test_idle_slot_blanks_frame() {
        let mut rng = seeded();
        let mut frame = [Rgb { r: 9, g: 9, b: 9 }; TOTAL_LEDS];
        let mut slot = EffectSlot::Idle;
        let mut ctx = FrameContext::new(0, &mut rng, &mut frame[..]);
        assert!(!slot.update(&mut ctx));
        assert!(frame.iter().all(|&pixel| pixel == Rgb::default()));
    }
}
