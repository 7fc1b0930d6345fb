use std::f32::consts::PI;

use rand::Rng;

use crate::analysis::{encode, Signal};
use crate::model::{Lead, LeadName};

const SAMPLING_FREQUENCY: f32 = 500.0;

/// Twelve synthetic leads of `samples` integer microvolt samples each.
pub fn mock_leads(samples: usize) -> Vec<Lead> {
    let mut rng = rand::thread_rng();
    LeadName::ALL
        .iter()
        .enumerate()
        .map(|(index, &name)| {
            let gain = lead_gain(name);
            let phase = index as f32 * 0.004;
            let signal: Vec<i64> = (0..samples)
                .map(|i| {
                    let time = phase + i as f32 / SAMPLING_FREQUENCY;
                    let noise: f32 = rng.gen_range(-20.0..20.0); // Random noise between -20 and +20 uV
                    (generate_ecg_waveform(time) * 1000.0 * gain + noise).round() as i64
                })
                .collect();
            Lead::new(name, encode(&Signal::from(signal))).with_num_samples(samples as i64)
        })
        .collect()
}

fn lead_gain(name: LeadName) -> f32 {
    match name {
        LeadName::I => 0.6,
        LeadName::II => 1.0,
        LeadName::III => 0.4,
        // aVR looks at the heart from the opposite side
        LeadName::AVR => -0.8,
        LeadName::AVL => 0.3,
        LeadName::AVF => 0.7,
        LeadName::V1 => -0.5,
        LeadName::V2 => 0.9,
        LeadName::V3 => 1.2,
        LeadName::V4 => 1.4,
        LeadName::V5 => 1.1,
        LeadName::V6 => 0.8,
    }
}

/// One synthetic P/QRS/T cycle per second around a zero baseline, in mV.
fn generate_ecg_waveform(time: f32) -> f32 {
    let p_wave_height = 0.15;
    let q_depth = 0.1;
    let r_height = 1.0;
    let s_depth = 0.25;
    let t_wave_height = 0.3;

    let cycle_time = time % 1.0; // Simulate a repeating cycle every 1 second

    if cycle_time < 0.1 {
        // P wave
        p_wave_height * (PI * cycle_time / 0.1).sin()
    } else if cycle_time < 0.2 {
        0.0
    } else if cycle_time < 0.22 {
        // Q
        -q_depth * (PI * (cycle_time - 0.2) / 0.02).sin()
    } else if cycle_time < 0.26 {
        // R
        r_height * (PI * (cycle_time - 0.22) / 0.04).sin()
    } else if cycle_time < 0.29 {
        // S
        -s_depth * (PI * (cycle_time - 0.26) / 0.03).sin()
    } else if cycle_time < 0.45 {
        0.0
    } else if cycle_time < 0.65 {
        // T wave
        t_wave_height * (PI * (cycle_time - 0.45) / 0.2).sin()
    } else {
        // Baseline
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_every_standard_lead() {
        let leads = mock_leads(250);
        let names: Vec<LeadName> = leads.iter().map(|l| l.name).collect();
        assert_eq!(names, LeadName::ALL.to_vec());
        for lead in &leads {
            assert_eq!(lead.num_samples, Some(250));
            assert_eq!(lead.decode().unwrap().len(), 250);
        }
    }

    #[test]
    fn qrs_complex_dominates_cycle() {
        assert!(generate_ecg_waveform(0.24) > 0.9);
        assert!(generate_ecg_waveform(0.275) < -0.2);
        assert_eq!(generate_ecg_waveform(0.8), 0.0);
    }
}
