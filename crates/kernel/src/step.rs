use crate::world::World;

impl World {
    /// Advance the world by `n` explicit diffusion steps of size `dt`.
    ///
    /// Each free cell becomes the weighted average of itself (weight
    /// `1 - alpha*dt/4`) and its non-insulating axis neighbours (weight
    /// `alpha*dt` each), clamped to `[0, 1]`. Fixed and insulating cells keep
    /// their temperature. All reads in an iteration come from the state as it
    /// was before that iteration.
    ///
    /// Border cells must be fixed or insulating; neighbour indices are not
    /// bounds-adjusted. Large `alpha*dt` (above 4) is unstable and is not
    /// detected: the clamp only bounds the symptom.
    pub fn step(&mut self, dt: f32, n: u32) {
        let _span = tracing::debug_span!(
            "step_world",
            width = self.width(),
            height = self.height(),
            dt,
            n
        )
        .entered();
        debug_assert!(
            self.border_is_sealed(),
            "stepping a world whose border cells are conductive"
        );

        let w = self.width() as usize;
        let h = self.height() as usize;

        let outer = self.alpha() * dt;
        let inner = 1.0 - outer / 4.0;

        let mut buffer = vec![0.0f32; self.state.len()];

        for _ in 0..n {
            let props = self.properties();
            let state = &self.state;
            for y in 0..h {
                for x in 0..w {
                    let index = y * w + x;
                    if props[index].blocks_update() {
                        buffer[index] = state[index];
                        continue;
                    }

                    let mut contrib = inner;
                    let mut acc = inner * state[index];
                    for nb in [index - w, index + w, index - 1, index + 1] {
                        if !props[nb].is_insulator() {
                            contrib += outer;
                            acc += outer * state[nb];
                        }
                    }
                    buffer[index] = (acc / contrib).clamp(0.0, 1.0);
                }
            }
            std::mem::swap(&mut self.state, &mut buffer);
            self.time += dt;
        }

        tracing::trace!(time = self.time, "step complete");
    }
}

#[cfg(test)]
mod tests {
    use crate::cell::CellFlags;
    use crate::generator::make_test_world;
    use crate::world::World;

    /// 3x3 box: insulated ring around one free centre cell.
    fn single_cell(center: f32) -> World {
        let mut props = vec![CellFlags::INSULATOR; 9];
        props[4] = CellFlags::NONE;
        let mut state = vec![0.0; 9];
        state[4] = center;
        World::new(3, 3, 0.1, props, state).unwrap()
    }

    /// 5x3 corridor: insulated border, three free cells in the middle row.
    fn corridor(left: CellFlags, left_temp: f32) -> World {
        let mut props = vec![CellFlags::INSULATOR; 15];
        props[6] = left;
        props[7] = CellFlags::NONE;
        props[8] = CellFlags::NONE;
        let mut state = vec![0.0; 15];
        state[6] = left_temp;
        World::new(5, 3, 0.5, props, state).unwrap()
    }

    #[test]
    fn isolated_cell_keeps_its_temperature() {
        let mut w = single_cell(0.5);
        w.step(1.0, 1);
        assert_eq!(w.state()[4], 0.5);
        assert_eq!(w.time(), 1.0);
    }

    #[test]
    fn time_advances_by_dt_per_iteration() {
        let mut w = single_cell(0.5);
        w.step(0.25, 4);
        assert_eq!(w.time(), 1.0);
        w.step(0.25, 0);
        assert_eq!(w.time(), 1.0);
    }

    #[test]
    fn heat_flows_from_fixed_source() {
        let mut w = corridor(CellFlags::FIXED, 1.0);
        w.step(1.0, 1);

        // outer = 0.5, inner = 0.875; middle cell sees the source and its
        // right neighbour, both readable.
        let expected_mid = (0.875 * 0.0 + 0.5 * 1.0 + 0.5 * 0.0) / (0.875 + 0.5 + 0.5);
        assert!((w.state()[7] - expected_mid).abs() < 1e-7);
        // Right cell only saw cold neighbours from the previous iteration.
        assert_eq!(w.state()[8], 0.0);
        assert_eq!(w.state()[6], 1.0);
    }

    #[test]
    fn update_reads_previous_iteration_only() {
        let mut w = corridor(CellFlags::FIXED, 1.0);
        w.step(1.0, 2);
        let after_one = (0.5f32) / (0.875 + 0.5 + 0.5);
        // Second iteration: right cell reads the first-iteration middle value.
        let expected_right = (0.5 * after_one) / (0.875 + 0.5);
        assert!((w.state()[8] - expected_right).abs() < 1e-7);
    }

    #[test]
    fn insulator_neighbour_is_ignored() {
        let mut w = corridor(CellFlags::INSULATOR, 1.0);
        w.step(1.0, 10);
        assert_eq!(w.state()[7], 0.0);
        assert_eq!(w.state()[8], 0.0);
        assert_eq!(w.state()[6], 1.0);
    }

    #[test]
    fn fixed_cells_never_change() {
        let mut w = make_test_world(16, 0.1).unwrap();
        let fixed: Vec<(usize, f32)> = w
            .properties()
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_fixed())
            .map(|(i, _)| (i, w.state()[i]))
            .collect();
        assert!(!fixed.is_empty());

        for _ in 0..5 {
            w.step(0.1, 50);
        }
        for (i, t) in fixed {
            assert_eq!(w.state()[i], t, "fixed cell {i} drifted");
        }
    }

    #[test]
    fn state_stays_in_unit_range() {
        let mut w = make_test_world(20, 0.1).unwrap();
        // Deliberately unstable: alpha*dt far above 4.
        w.step(100.0, 20);
        assert!(w.state().iter().all(|t| (0.0..=1.0).contains(t)));

        let mut stable = make_test_world(20, 0.1).unwrap();
        stable.step(0.1, 500);
        assert!(stable.state().iter().all(|t| (0.0..=1.0).contains(t)));
    }

    #[test]
    fn stepping_is_deterministic() {
        let mut a = make_test_world(24, 0.1).unwrap();
        let mut b = make_test_world(24, 0.1).unwrap();
        a.step(0.1, 200);
        b.step(0.1, 200);
        assert_eq!(a, b);
        let bits_a: Vec<u32> = a.state().iter().map(|t| t.to_bits()).collect();
        let bits_b: Vec<u32> = b.state().iter().map(|t| t.to_bits()).collect();
        assert_eq!(bits_a, bits_b);
    }

    #[test]
    fn split_calls_match_single_call() {
        let mut a = make_test_world(16, 0.1).unwrap();
        let mut b = make_test_world(16, 0.1).unwrap();
        a.step(0.1, 30);
        for _ in 0..3 {
            b.step(0.1, 10);
        }
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn heat_spreads_into_test_world() {
        let mut w = make_test_world(16, 0.1).unwrap();
        // Row 2 is directly below the source row.
        let before = w.temperature_at(5, 2).unwrap();
        w.step(0.1, 100);
        let after = w.temperature_at(5, 2).unwrap();
        assert_eq!(before, 0.0);
        assert!(after > 0.0);
    }
}
