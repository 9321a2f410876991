//! Full transmit/receive round trips through the public API: WAV bytes
//! in, WAV bytes out, decoded back through the real pipeline with no
//! internal shortcuts.

use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use wfsk_core::{analyze, decode_message, encode_message, mode_by_name, read_wav};

fn encode_to_pcm(text: &str, mode_name: &str) -> Vec<f32> {
    let config = mode_by_name(mode_name).unwrap();
    let wav = encode_message(text, &config).unwrap();
    let (pcm, rate, channels) = read_wav(&wav).unwrap();
    assert_eq!(rate, 16000);
    assert_eq!(channels, 1);
    pcm
}

#[test]
fn plain_round_trip_every_mode() {
    for mode in ["DEFAULT", "ROBUST", "FAST"] {
        let pcm = encode_to_pcm("the quick brown fox", mode);
        let outcome = decode_message(&pcm, 16000, mode).unwrap();
        assert_eq!(outcome.text, "the quick brown fox");
        assert_eq!(outcome.detected_mode, mode);
    }
}

#[test]
fn multi_packet_message_reassembles_in_order() {
    let text = "0123456789".repeat(10); // 100 bytes, 4 packets at PAYLOAD_SIZE 32
    let pcm = encode_to_pcm(&text, "DEFAULT");
    let outcome = decode_message(&pcm, 16000, "DEFAULT").unwrap();
    assert_eq!(outcome.text, text);
}

#[test]
fn clipping_to_0_7_amplitude_still_decodes() {
    let mut pcm = encode_to_pcm("clipped signal", "DEFAULT");
    for s in pcm.iter_mut() {
        *s = s.clamp(-0.7, 0.7);
    }
    let outcome = decode_message(&pcm, 16000, "DEFAULT").unwrap();
    assert_eq!(outcome.text, "clipped signal");
}

#[test]
fn truncating_preamble_breaks_synchronization() {
    let pcm = encode_to_pcm("will not sync", "DEFAULT");
    let truncated = &pcm[160..];
    let outcome = decode_message(truncated, 16000, "DEFAULT").unwrap();
    assert_ne!(outcome.text, "will not sync");
}

#[test]
fn analyze_matches_decode_mode_selection() {
    let pcm = encode_to_pcm("diagnostic pass", "ROBUST");
    let decode_outcome = decode_message(&pcm, 16000, "").unwrap();
    let analyze_outcome = analyze(&pcm, 16000).unwrap();
    assert_eq!(decode_outcome.detected_mode, "ROBUST");
    assert_eq!(analyze_outcome.mode, Some("ROBUST".to_string()));
    assert!(analyze_outcome.analyses.iter().all(|a| a.crc_valid));
}

#[test]
#[ignore = "statistical: run with --ignored across many seeds when tuning FEC margins"]
fn awgn_at_10db_snr_decodes_across_seeds() {
    let mut successes = 0;
    for seed in 0u64..100 {
        let pcm = encode_to_pcm("noisy", "ROBUST");
        let signal_power = pcm.iter().map(|&s| s * s).sum::<f32>() / pcm.len() as f32;
        let snr_db = 10.0f32;
        let noise_power = signal_power / 10f32.powf(snr_db / 10.0);
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, noise_power.sqrt()).unwrap();
        let noisy: Vec<f32> = pcm.iter().map(|&s| s + normal.sample(&mut rng)).collect();

        if decode_message(&noisy, 16000, "ROBUST").unwrap().text == "noisy" {
            successes += 1;
        }
    }
    assert!(successes >= 90, "only {successes}/100 seeds decoded at 10dB SNR");
}

#[test]
fn pure_white_noise_never_false_decodes() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let normal = Normal::new(0.0f32, 0.3).unwrap();
    let noise: Vec<f32> = (0..32000).map(|_| normal.sample(&mut rng)).collect();
    let outcome = decode_message(&noise, 16000, "DEFAULT").unwrap();
    assert_eq!(outcome.detected_mode, "");
}
