//! Decorative terminal output for a matched command.
//!
//! Everything here is a fixed template filled with the target, a few flags
//! and random hex identifiers. No container state is consulted.

use crate::grammar::Verb;
use crate::parser::Flags;
use rand::RngCore;

pub const SHORT_ID_LEN: usize = 12;
pub const DIGEST_LEN: usize = 64;

const LOG_TIMESTAMP: &str = "2025-11-17 12:00";

/// Lowercase hex identifier of `len` characters.
pub fn random_hex_id<R: RngCore + ?Sized>(rng: &mut R, len: usize) -> String {
    let mut bytes = vec![0u8; len.div_ceil(2)];
    rng.fill_bytes(&mut bytes);
    let mut id = hex::encode(bytes);
    id.truncate(len);
    id
}

fn short_id<R: RngCore + ?Sized>(rng: &mut R) -> String {
    random_hex_id(rng, SHORT_ID_LEN)
}

/// Output using the thread-local RNG.
pub fn synthesize(verb: Verb, target: &str, flags: &Flags) -> String {
    synthesize_with(verb, target, flags, &mut rand::rng())
}

pub fn synthesize_with<R: RngCore + ?Sized>(verb: Verb, target: &str, flags: &Flags, rng: &mut R) -> String {
    match verb {
        Verb::Run => format!("{}\n🚢 Container is now sailing in the harbor!", short_id(rng)),
        Verb::Ps => {
            let mut out = format!(
                "CONTAINER ID   IMAGE     COMMAND     STATUS       PORTS     NAMES\n\
                 {}   nginx     \"nginx\"     Up 2 hours   80/tcp    harbor-web\n\
                 {}   redis     \"redis\"     Up 1 hour    6379/tcp  harbor-cache",
                short_id(rng),
                short_id(rng)
            );
            if flags.all {
                out.push_str(&format!(
                    "\n{}   mysql     \"mysql\"     Exited       3306/tcp  harbor-db",
                    short_id(rng)
                ));
            }
            out
        }
        Verb::Stop => format!("{}\n⚓ Container has been anchored.", target),
        Verb::Rm => format!("{}\n🗑️ Container has left the harbor.", target),
        Verb::Start => format!("{}\n⛵ Container is sailing again!", target),
        Verb::Restart => format!("{}\n🔄 Container has been restarted.", target),
        Verb::Images => format!(
            "REPOSITORY   TAG       IMAGE ID       CREATED        SIZE\n\
             nginx        latest    {}   2 days ago     142MB\n\
             redis        latest    {}   1 week ago     117MB",
            short_id(rng),
            short_id(rng)
        ),
        Verb::Pull => format!(
            "Pulling from library/{target}\n\
             latest: Pulling from library/{target}\n\
             Digest: sha256:{digest}\n\
             Status: Downloaded newer image for {target}:latest\n\
             📥 Blueprint added to your shipyard!",
            target = target,
            digest = random_hex_id(rng, DIGEST_LEN)
        ),
        Verb::Logs => (0..3)
            .map(|second| {
                let line = match second {
                    0 => "Starting service...",
                    1 => "Service ready!",
                    _ => "Handling requests...",
                };
                format!("[{}] {}:{:02} {}", target, LOG_TIMESTAMP, second, line)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Verb::Inspect => format!(
            "[\n    {{\n        \"Id\": \"{}\",\n        \"Name\": \"{}\",\n        \"State\": \"running\",\n        \"Image\": \"nginx:latest\"\n    }}\n]",
            random_hex_id(rng, DIGEST_LEN),
            target
        ),
        Verb::Build => format!(
            "Step 1/3 : FROM alpine:latest\n ---> {}\n\
             Step 2/3 : RUN echo \"Building...\"\n ---> {}\n\
             Step 3/3 : CMD [\"echo\", \"Hello Harbor!\"]\n ---> {}\n\
             Successfully built {}\n\
             🏗️ New ship blueprint created!",
            short_id(rng),
            short_id(rng),
            short_id(rng),
            short_id(rng)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;

    fn render(verb: Verb, target: &str, flags: &Flags) -> String {
        synthesize_with(verb, target, flags, &mut StdRng::seed_from_u64(42))
    }

    fn is_hex(s: &str, len: usize) -> bool {
        s.len() == len && s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    }

    #[test]
    fn hex_ids_have_requested_length() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(is_hex(&random_hex_id(&mut rng, SHORT_ID_LEN), 12));
        assert!(is_hex(&random_hex_id(&mut rng, DIGEST_LEN), 64));
        assert!(is_hex(&random_hex_id(&mut rng, 7), 7));
    }

    #[test]
    fn same_seed_same_output() {
        let flags = Flags::default();
        assert_eq!(render(Verb::Build, ".", &flags), render(Verb::Build, ".", &flags));
    }

    #[test]
    fn run_starts_with_short_id() {
        let out = render(Verb::Run, "nginx", &Flags::default());
        let first = out.lines().next().unwrap();
        assert!(is_hex(first, 12));
        assert!(out.ends_with("sailing in the harbor!"));
    }

    #[test]
    fn ps_adds_exited_row_with_all() {
        let plain = render(Verb::Ps, "", &Flags::default());
        assert_eq!(plain.lines().count(), 3);

        let all = Flags {
            all: true,
            ..Default::default()
        };
        let out = render(Verb::Ps, "", &all);
        assert_eq!(out.lines().count(), 4);
        assert!(out.lines().last().unwrap().contains("Exited"));
        for row in out.lines().skip(1) {
            assert!(is_hex(&row[..12], 12));
        }
    }

    #[test]
    fn state_changes_echo_target() {
        for verb in [Verb::Stop, Verb::Rm, Verb::Start, Verb::Restart] {
            let out = render(verb, "web", &Flags::default());
            assert_eq!(out.lines().next(), Some("web"));
            assert_eq!(out.lines().count(), 2);
        }
    }

    #[test]
    fn pull_includes_digest() {
        let out = render(Verb::Pull, "redis", &Flags::default());
        let re = Regex::new(r"Digest: sha256:[0-9a-f]{64}\n").unwrap();
        assert!(re.is_match(&out));
        assert!(out.contains("Downloaded newer image for redis:latest"));
    }

    #[test]
    fn logs_are_fixed() {
        let out = render(Verb::Logs, "web", &Flags::default());
        assert_eq!(
            out,
            "[web] 2025-11-17 12:00:00 Starting service...\n\
             [web] 2025-11-17 12:00:01 Service ready!\n\
             [web] 2025-11-17 12:00:02 Handling requests..."
        );
    }

    #[test]
    fn inspect_and_build_shapes() {
        let inspect = render(Verb::Inspect, "web", &Flags::default());
        assert!(inspect.contains("\"Name\": \"web\""));
        assert!(inspect.contains("\"State\": \"running\""));
        assert!(Regex::new(r#""Id": "[0-9a-f]{64}""#).unwrap().is_match(&inspect));

        let build = render(Verb::Build, ".", &Flags::default());
        assert!(Regex::new(r"Successfully built [0-9a-f]{12}\n").unwrap().is_match(&build));
        assert_eq!(build.matches(" ---> ").count(), 3);
    }

    #[test]
    fn images_table_has_two_rows() {
        let out = render(Verb::Images, "", &Flags::default());
        assert_eq!(out.lines().count(), 3);
        assert!(out.starts_with("REPOSITORY"));
    }
}
