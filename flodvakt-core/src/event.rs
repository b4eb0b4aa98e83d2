//! ## flodvakt-core::event
//! **Synthetic packet events and the pure synthesizer that produces them**

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scenario::ScenarioProfile;

/// Smallest frame length an event may report (bytes).
pub const MIN_LEN: u16 = 64;
/// Largest frame length an event may report, the Ethernet MTU.
pub const MAX_LEN: u16 = 1500;

/// One synthetic traffic record pushed to a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketEvent {
    pub id: Uuid,
    pub src: String,
    pub dst: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub len: u16,
    pub flags: String,
    pub color: String,
}

/// Produces one event for `profile`, drawing every random choice from `rng`.
///
/// The length is uniform over `[MIN_LEN, MAX_LEN]`. Profiles carrying a
/// [`LabelBranch`](crate::scenario::LabelBranch) flip a weighted coin between
/// their primary and alternate type/color pair; all other labels are fixed.
pub fn synthesize<R: Rng + ?Sized>(profile: &ScenarioProfile, rng: &mut R) -> PacketEvent {
    let (kind, color) = match &profile.branch {
        Some(branch) if !rng.random_bool(branch.primary_probability) => {
            (branch.alternate_kind, branch.alternate_color)
        }
        _ => (profile.kind, profile.color),
    };
    let len = rng.random_range(MIN_LEN..=MAX_LEN);

    let mut id = [0u8; 16];
    rng.fill_bytes(&mut id);

    PacketEvent {
        id: uuid::Builder::from_random_bytes(id).into_uuid(),
        src: profile.src.to_string(),
        dst: profile.dst.to_string(),
        kind: kind.to_string(),
        len,
        flags: profile.flags.to_string(),
        color: color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{Scenario, ScenarioRegistry};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fixed_scenarios_keep_their_labels() {
        let registry = ScenarioRegistry::default();
        let mut rng = StdRng::seed_from_u64(1);
        let expected = [
            (Scenario::Ddos, "Hacker", "Server", "UDP", "A", "red"),
            (Scenario::Scan, "Hacker", "My PC", "TCP (SYN)", "S", "purple"),
            (Scenario::Sqli, "Hacker", "Server", "HTTP (Malicious)", "A", "yellow"),
            (Scenario::Mitm, "My PC", "Hacker", "HTTPS (Intercepted)", "A", "magenta"),
        ];
        for (scenario, src, dst, kind, flags, color) in expected {
            for _ in 0..50 {
                let event = synthesize(registry.profile(scenario), &mut rng);
                assert_eq!(
                    (
                        event.src.as_str(),
                        event.dst.as_str(),
                        event.kind.as_str(),
                        event.flags.as_str(),
                        event.color.as_str()
                    ),
                    (src, dst, kind, flags, color)
                );
            }
        }
    }

    #[test]
    fn normal_picks_one_of_two_pairs() {
        let registry = ScenarioRegistry::default();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let event = synthesize(registry.profile(Scenario::Normal), &mut rng);
            assert_eq!(event.src, "My PC");
            assert_eq!(event.dst, "Router");
            assert_eq!(event.flags, "A");
            match (event.kind.as_str(), event.color.as_str()) {
                ("TCP", "cyan") | ("UDP", "orange") => {}
                other => panic!("unexpected NORMAL labels {other:?}"),
            }
        }
    }

    #[test]
    fn normal_tcp_fraction_tracks_probability() {
        let registry = ScenarioRegistry::default();
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let tcp = (0..1000)
            .map(|_| synthesize(registry.profile(Scenario::Normal), &mut rng))
            .filter(|event| event.kind == "TCP")
            .count();
        let fraction = tcp as f64 / 1000.0;
        assert!((fraction - 0.7).abs() < 0.05, "TCP fraction {fraction}");
    }

    #[test]
    fn seeded_source_reproduces_stream() {
        let registry = ScenarioRegistry::default();
        let profile = registry.profile(Scenario::Normal);
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        for _ in 0..10 {
            assert_eq!(synthesize(profile, &mut a), synthesize(profile, &mut b));
        }
    }

    #[test]
    fn identifiers_are_fresh() {
        let registry = ScenarioRegistry::default();
        let mut rng = StdRng::seed_from_u64(3);
        let ids: std::collections::HashSet<_> = (0..500)
            .map(|_| synthesize(registry.profile(Scenario::Ddos), &mut rng).id)
            .collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let registry = ScenarioRegistry::default();
        let event = synthesize(
            registry.profile(Scenario::Scan),
            &mut StdRng::seed_from_u64(4),
        );
        let value = serde_json::to_value(&event).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["color", "dst", "flags", "id", "len", "src", "type"]);
        assert_eq!(object["type"], "TCP (SYN)");
        assert!(object["id"].is_string());
    }

    proptest! {
        #[test]
        fn length_stays_within_mtu_bounds(seed in any::<u64>(), which in 0u8..5) {
            let registry = ScenarioRegistry::default();
            let scenario = Scenario::from_index(which).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let event = synthesize(registry.profile(scenario), &mut rng);
            prop_assert!((MIN_LEN..=MAX_LEN).contains(&event.len));
        }
    }
}
