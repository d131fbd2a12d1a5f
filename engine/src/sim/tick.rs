//! Per-Tick Simulation Update
//!
//! Advances the claw machine by exactly one tick: phase transitions, claw
//! steering and lift, the capture test, and toy attach/fall physics. All
//! motion uses fixed per-tick steps; the caller is responsible for pacing
//! ticks at [`super::consts::TICK_RATE`].

use glam::{Vec2, Vec3};

use crate::input::InputSnapshot;

use super::consts::*;
use super::state::{ClawMotion, GamePhase, SimState};

/// Advance the simulation by one tick.
///
/// `facing_front` is the camera gate: the coin/collect action only registers
/// while the player is looking at the front of the machine.
pub fn tick(state: &mut SimState, input: &InputSnapshot, facing_front: bool) {
    // Tilt is derived per tick; steering below reapplies it.
    state.joystick = Default::default();

    // Rising edges for the two one-shot actions.
    let coin_pressed = input.coin && !state.edges.coin_was_held;
    let grab_pressed = input.grab && !state.edges.grab_was_held;
    state.edges.coin_was_held = input.coin;
    state.edges.grab_was_held = input.grab;

    if facing_front && coin_pressed {
        collect_chute_prizes(state);
        if state.phase == GamePhase::WaitingForCoin {
            state.phase = GamePhase::Playing;
            log::info!("coin accepted, round started");
        }
    }

    if state.phase == GamePhase::Playing && state.claw.motion == ClawMotion::Idle {
        steer_claw(state, input);

        if grab_pressed {
            if state.claw.holding {
                release_held_toy(state);
            } else {
                state.claw.motion = ClawMotion::Descending;
            }
        }
    }

    // Horizontal position stays inside the steering range no matter what.
    state.claw.x = state.claw.x.clamp(-CLAW_RANGE, CLAW_RANGE);
    state.claw.z = state.claw.z.clamp(-CLAW_RANGE, CLAW_RANGE);

    advance_claw_lift(state);
    advance_toys(state);

    debug_assert!(state.caught_count() <= 1, "more than one toy caught");
}

/// Mark every prize sitting in the chute as collected.
fn collect_chute_prizes(state: &mut SimState) {
    for toy in &mut state.toys {
        if toy.dropped && !toy.taken {
            toy.taken = true;
            log::info!("prize collected from chute");
        }
    }
}

/// Apply held direction keys to the claw and tilt the joystick visual.
fn steer_claw(state: &mut SimState, input: &InputSnapshot) {
    if input.move_north {
        state.claw.z -= CLAW_MOVE_STEP;
        state.joystick.x_deg = -JOYSTICK_TILT_DEG;
    }
    if input.move_south {
        state.claw.z += CLAW_MOVE_STEP;
        state.joystick.x_deg = JOYSTICK_TILT_DEG;
    }
    if input.move_west {
        state.claw.x -= CLAW_MOVE_STEP;
        state.joystick.z_deg = JOYSTICK_TILT_DEG;
    }
    if input.move_east {
        state.claw.x += CLAW_MOVE_STEP;
        state.joystick.z_deg = -JOYSTICK_TILT_DEG;
    }
}

/// Release the held toy into free fall and end the round.
fn release_held_toy(state: &mut SimState) {
    for toy in &mut state.toys {
        if toy.caught {
            toy.caught = false;
            toy.falling = true;
            toy.vertical_velocity = 0.0;
        }
    }
    state.claw.holding = false;
    state.phase = GamePhase::WaitingForCoin;
    log::info!("toy released");
}

/// Advance a descent or ascent in progress. Runs in any game phase.
fn advance_claw_lift(state: &mut SimState) {
    match state.claw.motion {
        ClawMotion::Descending => {
            state.claw.y -= CLAW_LIFT_STEP;
            if state.claw.y <= CLAW_CAPTURE_Y {
                state.claw.motion = ClawMotion::Ascending;
                try_capture(state);
            }
        }
        ClawMotion::Ascending => {
            state.claw.y += CLAW_LIFT_STEP;
            if state.claw.y >= CLAW_REST_Y {
                state.claw.motion = ClawMotion::Idle;
            }
        }
        ClawMotion::Idle => {}
    }
}

/// Capture test at the bottom of a descent: the first toy in array order
/// that is still in play and within the capture radius gets caught. At most
/// one toy per descent.
fn try_capture(state: &mut SimState) {
    let claw_xz = Vec2::new(state.claw.x, state.claw.z);
    for toy in &mut state.toys {
        if toy.dropped || toy.taken {
            continue;
        }
        let toy_xz = Vec2::new(toy.position.x, toy.position.z);
        if claw_xz.distance(toy_xz) < CAPTURE_RADIUS {
            toy.caught = true;
            state.claw.holding = true;
            log::info!("toy captured at ({:.2}, {:.2})", toy_xz.x, toy_xz.y);
            break;
        }
    }
}

/// Per-toy physics: caught toys chase their hang position, falling toys
/// integrate gravity and land.
fn advance_toys(state: &mut SimState) {
    let claw = state.claw.clone();

    for toy in &mut state.toys {
        if toy.caught {
            let hang_offset = HANG_BASE_OFFSET + toy.half_height * HANG_HALF_HEIGHT_FACTOR;
            let mut desired = Vec3::new(claw.x, claw.y - hang_offset, claw.z);

            // Keep the toy's footprint inside the glass.
            let min_x = -GLASS_HALF_EXTENT + toy.half_extents.x + GLASS_INSET;
            let max_x = GLASS_HALF_EXTENT - toy.half_extents.x - GLASS_INSET;
            let min_z = -GLASS_HALF_EXTENT + toy.half_extents.z + GLASS_INSET;
            let max_z = GLASS_HALF_EXTENT - toy.half_extents.z - GLASS_INSET;
            desired.x = desired.x.clamp(min_x, max_x);
            desired.z = desired.z.clamp(min_z, max_z);
            desired.y = desired.y.clamp(
                HANG_BOTTOM_LIMIT + toy.half_extents.y,
                HANG_TOP_LIMIT - toy.half_extents.y,
            );

            // The lag of the lerp is the mechanical feel; keep it.
            toy.position = toy.position.lerp(desired, FOLLOW_LERP);
        }

        if toy.falling {
            toy.vertical_velocity -= FALL_GRAVITY;
            toy.position.y += toy.vertical_velocity;

            let floor = floor_level_at(toy.position.x, toy.position.z);
            if toy.position.y <= floor {
                toy.position.y = floor;
                toy.falling = false;
                toy.vertical_velocity = 0.0;
                if floor == CHUTE_FLOOR_Y {
                    toy.dropped = true;
                    log::info!("toy landed in the chute");
                }
            }
        }
    }
}

/// Landing floor height at a horizontal position: the chute zone has a
/// lower floor than the prize table.
fn floor_level_at(x: f32, z: f32) -> f32 {
    if x < CHUTE_MAX_X && z > CHUTE_MIN_Z {
        CHUTE_FLOOR_Y
    } else {
        TABLE_FLOOR_Y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_input() -> InputSnapshot {
        InputSnapshot::default()
    }

    fn coin_input() -> InputSnapshot {
        InputSnapshot {
            coin: true,
            ..Default::default()
        }
    }

    fn grab_input() -> InputSnapshot {
        InputSnapshot {
            grab: true,
            ..Default::default()
        }
    }

    /// Run ticks until the claw finishes a full descent/ascent cycle.
    fn run_lift_cycle(state: &mut SimState) {
        let mut guard = 0;
        while state.claw.motion != ClawMotion::Idle {
            tick(state, &idle_input(), true);
            guard += 1;
            assert!(guard < 1000, "lift cycle did not terminate");
        }
    }

    fn start_playing(state: &mut SimState) {
        tick(state, &coin_input(), true);
        tick(state, &idle_input(), true);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn front_facing_click_starts_play() {
        let mut state = SimState::new();
        tick(&mut state, &coin_input(), true);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn click_while_facing_away_does_nothing() {
        let mut state = SimState::new();
        tick(&mut state, &coin_input(), false);
        assert_eq!(state.phase, GamePhase::WaitingForCoin);
    }

    #[test]
    fn coin_click_requires_rising_edge() {
        let mut state = SimState::new();
        tick(&mut state, &coin_input(), true);
        assert_eq!(state.phase, GamePhase::Playing);

        // Release the button, then press again with a prize in the chute.
        tick(&mut state, &idle_input(), true);
        state.toys[0].dropped = true;
        state.phase = GamePhase::WaitingForCoin;
        tick(&mut state, &coin_input(), true);
        assert!(state.toys[0].taken);

        // Still held: a second prize appearing must not be auto-collected.
        state.toys[1].dropped = true;
        tick(&mut state, &coin_input(), true);
        assert!(!state.toys[1].taken);
    }

    #[test]
    fn collecting_a_prize_marks_it_taken() {
        let mut state = SimState::new();
        state.toys[1].dropped = true;
        assert!(state.prize_in_chute());
        tick(&mut state, &coin_input(), true);
        assert!(state.toys[1].taken);
        assert!(!state.prize_in_chute());
    }

    #[test]
    fn claw_steering_moves_and_clamps() {
        let mut state = SimState::new();
        start_playing(&mut state);

        let east = InputSnapshot {
            move_east: true,
            ..Default::default()
        };
        let before = state.claw.x;
        tick(&mut state, &east, true);
        assert!((state.claw.x - (before + CLAW_MOVE_STEP)).abs() < 1e-6);
        assert_eq!(state.joystick.z_deg, -JOYSTICK_TILT_DEG);

        // Hold east long enough to hit the wall; x must never exceed range.
        for _ in 0..200 {
            tick(&mut state, &east, true);
            assert!(state.claw.x <= CLAW_RANGE);
            assert!(state.claw.x >= -CLAW_RANGE);
        }
        assert_eq!(state.claw.x, CLAW_RANGE);
    }

    #[test]
    fn joystick_tilt_resets_when_keys_released() {
        let mut state = SimState::new();
        start_playing(&mut state);

        let north = InputSnapshot {
            move_north: true,
            ..Default::default()
        };
        tick(&mut state, &north, true);
        assert_eq!(state.joystick.x_deg, -JOYSTICK_TILT_DEG);
        tick(&mut state, &idle_input(), true);
        assert_eq!(state.joystick.x_deg, 0.0);
        assert_eq!(state.joystick.z_deg, 0.0);
    }

    #[test]
    fn steering_ignored_while_waiting_for_coin() {
        let mut state = SimState::new();
        let east = InputSnapshot {
            move_east: true,
            ..Default::default()
        };
        tick(&mut state, &east, false);
        assert_eq!(state.claw.x, 0.0);
    }

    #[test]
    fn grab_press_starts_descent() {
        let mut state = SimState::new();
        start_playing(&mut state);
        tick(&mut state, &grab_input(), true);
        assert_eq!(state.claw.motion, ClawMotion::Descending);
    }

    #[test]
    fn grab_held_does_not_retrigger() {
        let mut state = SimState::new();
        // Move both toys out of capture range of the origin.
        state.toys[0].position = Vec3::new(1.2, 1.15, 1.2);
        state.toys[1].position = Vec3::new(-1.2, 1.15, -1.2);
        start_playing(&mut state);

        // Hold space for the entire lift cycle.
        tick(&mut state, &grab_input(), true);
        assert_eq!(state.claw.motion, ClawMotion::Descending);
        let mut guard = 0;
        while state.claw.motion != ClawMotion::Idle {
            tick(&mut state, &grab_input(), true);
            guard += 1;
            assert!(guard < 1000);
        }
        assert!(!state.claw.holding);

        // Space still held: no new descent may start.
        tick(&mut state, &grab_input(), true);
        assert_eq!(state.claw.motion, ClawMotion::Idle);
    }

    #[test]
    fn descent_bottoms_out_and_ascends() {
        let mut state = SimState::new();
        start_playing(&mut state);
        tick(&mut state, &grab_input(), true);

        let mut reached_bottom = false;
        let mut guard = 0;
        while state.claw.motion != ClawMotion::Idle {
            tick(&mut state, &idle_input(), true);
            if state.claw.motion == ClawMotion::Ascending {
                reached_bottom = true;
                assert!(state.claw.y <= CLAW_CAPTURE_Y + CLAW_LIFT_STEP);
            }
            guard += 1;
            assert!(guard < 1000);
        }
        assert!(reached_bottom);
        assert!(state.claw.y >= CLAW_REST_Y);
    }

    #[test]
    fn toy_in_radius_is_captured_at_the_bottom() {
        let mut state = SimState::new();
        start_playing(&mut state);
        // Park the claw over toy 0.
        state.claw.x = 0.3;
        state.claw.z = -0.4;
        tick(&mut state, &grab_input(), true);
        run_lift_cycle(&mut state);

        assert!(state.toys[0].caught);
        assert!(state.claw.holding);
        assert_eq!(state.caught_count(), 1);
    }

    #[test]
    fn toy_outside_radius_is_never_captured() {
        let mut state = SimState::new();
        // Keep every toy well outside the capture radius of the origin.
        state.toys[0].position = Vec3::new(1.2, 1.15, 1.2);
        state.toys[1].position = Vec3::new(-1.2, 1.15, -1.2);
        start_playing(&mut state);
        tick(&mut state, &grab_input(), true);
        run_lift_cycle(&mut state);

        assert!(!state.claw.holding);
        assert_eq!(state.caught_count(), 0);
    }

    #[test]
    fn capture_scan_takes_first_match_in_array_order() {
        let mut state = SimState::new();
        // Stack both toys inside the radius of the same spot.
        state.toys[0].position = Vec3::new(0.1, 1.15, 0.0);
        state.toys[1].position = Vec3::new(-0.1, 1.15, 0.0);
        start_playing(&mut state);
        tick(&mut state, &grab_input(), true);
        run_lift_cycle(&mut state);

        assert!(state.toys[0].caught);
        assert!(!state.toys[1].caught);
        assert_eq!(state.caught_count(), 1);
    }

    #[test]
    fn dropped_and_taken_toys_are_skipped_by_capture() {
        let mut state = SimState::new();
        state.toys[0].position = Vec3::new(0.0, 1.15, 0.0);
        state.toys[0].dropped = true;
        state.toys[1].position = Vec3::new(0.0, 1.15, 0.0);
        state.toys[1].taken = true;
        start_playing(&mut state);
        tick(&mut state, &grab_input(), true);
        run_lift_cycle(&mut state);
        assert_eq!(state.caught_count(), 0);
    }

    #[test]
    fn caught_toy_follows_the_claw_with_lag() {
        let mut state = SimState::new();
        start_playing(&mut state);
        state.claw.x = 0.3;
        state.claw.z = -0.4;
        tick(&mut state, &grab_input(), true);
        run_lift_cycle(&mut state);
        assert!(state.toys[0].caught);

        // Steer east; the toy must move toward the claw but not snap.
        let east = InputSnapshot {
            move_east: true,
            ..Default::default()
        };
        let before = state.toys[0].position;
        tick(&mut state, &east, true);
        let after = state.toys[0].position;
        // Moves toward the claw but lands strictly short of it.
        assert!(after.x > before.x);
        assert!(after.x < state.claw.x, "lerp must lag, not snap");
    }

    #[test]
    fn hanging_toy_stays_inside_the_glass() {
        let mut state = SimState::new();
        start_playing(&mut state);
        state.claw.x = 0.3;
        state.claw.z = -0.4;
        tick(&mut state, &grab_input(), true);
        run_lift_cycle(&mut state);
        assert!(state.claw.holding);

        // Drag the claw into the corner and let the toy settle.
        let push = InputSnapshot {
            move_east: true,
            move_south: true,
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut state, &push, true);
        }
        let toy = &state.toys[0];
        let max_x = GLASS_HALF_EXTENT - toy.half_extents.x - GLASS_INSET;
        let max_z = GLASS_HALF_EXTENT - toy.half_extents.z - GLASS_INSET;
        assert!(toy.position.x <= max_x + 1e-4);
        assert!(toy.position.z <= max_z + 1e-4);
    }

    #[test]
    fn release_drops_the_toy_and_ends_the_round() {
        let mut state = SimState::new();
        start_playing(&mut state);
        state.claw.x = 0.3;
        state.claw.z = -0.4;
        tick(&mut state, &grab_input(), true);
        run_lift_cycle(&mut state);
        assert!(state.claw.holding);

        // Release space, then press it again while holding.
        tick(&mut state, &idle_input(), true);
        tick(&mut state, &grab_input(), true);

        assert!(!state.claw.holding);
        assert_eq!(state.phase, GamePhase::WaitingForCoin);
        let toy = &state.toys[0];
        assert!(!toy.caught);
        assert!(toy.falling);
        // One tick of gravity has already been applied on the release tick.
        assert!((toy.vertical_velocity - -FALL_GRAVITY).abs() < 1e-6);
    }

    #[test]
    fn toy_released_over_the_chute_lands_low_and_is_dropped() {
        let mut state = SimState::new();
        state.toys[0].position = Vec3::new(-1.0, 3.0, 0.6);
        state.toys[0].falling = true;

        for _ in 0..1000 {
            tick(&mut state, &idle_input(), false);
            if !state.toys[0].falling {
                break;
            }
        }
        let toy = &state.toys[0];
        assert!(!toy.falling);
        assert_eq!(toy.position.y, CHUTE_FLOOR_Y);
        assert_eq!(toy.vertical_velocity, 0.0);
        assert!(toy.dropped);
    }

    #[test]
    fn toy_released_over_the_table_lands_high_and_is_not_dropped() {
        let mut state = SimState::new();
        state.toys[0].position = Vec3::new(0.0, 3.0, 0.0);
        state.toys[0].falling = true;

        for _ in 0..1000 {
            tick(&mut state, &idle_input(), false);
            if !state.toys[0].falling {
                break;
            }
        }
        let toy = &state.toys[0];
        assert!(!toy.falling);
        assert_eq!(toy.position.y, TABLE_FLOOR_Y);
        assert!(!toy.dropped);
    }

    #[test]
    fn falling_accelerates_downward() {
        let mut state = SimState::new();
        state.toys[0].position = Vec3::new(0.0, 10.0, 0.0);
        state.toys[0].falling = true;

        tick(&mut state, &idle_input(), false);
        let y1 = state.toys[0].position.y;
        tick(&mut state, &idle_input(), false);
        let y2 = state.toys[0].position.y;
        // Second step covers more distance than the first.
        assert!((10.0 - y1) < (y1 - y2));
    }

    #[test]
    fn at_most_one_toy_caught_over_a_long_run() {
        let mut state = SimState::new();
        // Park both toys in range, run several full grab cycles.
        state.toys[0].position = Vec3::new(0.1, 1.15, 0.0);
        state.toys[1].position = Vec3::new(-0.1, 1.15, 0.0);
        start_playing(&mut state);
        for _ in 0..5 {
            tick(&mut state, &grab_input(), true);
            run_lift_cycle(&mut state);
            assert!(state.caught_count() <= 1);
            tick(&mut state, &idle_input(), true);
        }
    }

    #[test]
    fn chute_floor_boundary_is_exclusive() {
        // Exactly on the boundary counts as table, not chute.
        assert_eq!(floor_level_at(-0.8, 0.6), TABLE_FLOOR_Y);
        assert_eq!(floor_level_at(-1.0, 0.5), TABLE_FLOOR_Y);
        assert_eq!(floor_level_at(-1.0, 0.6), CHUTE_FLOOR_Y);
        assert_eq!(floor_level_at(0.0, 0.0), TABLE_FLOOR_Y);
    }
}
