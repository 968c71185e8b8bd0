#![no_main]

use libfuzzer_sys::fuzz_target;

use shakeguard_core::{AccelSample, ShakeDetector, SHAKE_DEBOUNCE_MS, SHAKE_THRESHOLD_G};

fuzz_target!(|readings: Vec<(f32, f32, f32, u16)>| {
    let mut detector = ShakeDetector::new();
    let mut elapsed_ms: u64 = 0;
    let mut accepted: Vec<u64> = Vec::new();

    for (x, y, z, gap) in readings {
        elapsed_ms += u64::from(gap);
        let sample = AccelSample::new(x, y, z, elapsed_ms);
        let g = sample.g_force();

        let out = detector.process_sample(&sample);

        // Axis pass-through is unconditional (bit compare: NaN inputs stay NaN)
        assert_eq!(out.tilt.0.to_bits(), x.to_bits());
        assert_eq!(out.tilt.1.to_bits(), y.to_bits());

        if let Some(event) = out.shake {
            assert_eq!(event.at_ms, elapsed_ms);
            // Only above-threshold samples may ever emit (NaN magnitudes
            // fail the comparison and must stay silent too)
            assert!(g > SHAKE_THRESHOLD_G);
            accepted.push(event.at_ms);
        }
    }

    // No two accepted shakes inside the debounce window
    for pair in accepted.windows(2) {
        assert!(pair[1] - pair[0] >= SHAKE_DEBOUNCE_MS);
    }
});
