use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// A docker verb the simulator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Run,
    Ps,
    Stop,
    Rm,
    Images,
    Pull,
    Start,
    Restart,
    Logs,
    Inspect,
    Build,
}

impl Verb {
    /// Every verb, in the order the grammar table is scanned.
    pub const ALL: [Verb; 11] = [
        Verb::Run,
        Verb::Ps,
        Verb::Stop,
        Verb::Rm,
        Verb::Images,
        Verb::Pull,
        Verb::Start,
        Verb::Restart,
        Verb::Logs,
        Verb::Inspect,
        Verb::Build,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Run => "run",
            Verb::Ps => "ps",
            Verb::Stop => "stop",
            Verb::Rm => "rm",
            Verb::Images => "images",
            Verb::Pull => "pull",
            Verb::Start => "start",
            Verb::Restart => "restart",
            Verb::Logs => "logs",
            Verb::Inspect => "inspect",
            Verb::Build => "build",
        }
    }

    /// Exact, lowercase lookup by verb name.
    pub fn from_name(name: &str) -> Option<Verb> {
        Verb::ALL.iter().copied().find(|v| v.as_str() == name)
    }

    /// Harbor metaphor shown alongside a successful command.
    pub fn metaphor(self) -> &'static str {
        match self {
            Verb::Run => "🚢 Running a container is like launching a new ship from a blueprint into the harbor. The ship (container) begins its voyage (execution).",
            Verb::Ps => "📋 Listing containers is like checking which ships are currently in your harbor. You can see all active vessels at a glance.",
            Verb::Stop => "⚓ Stopping a container is like anchoring a ship. It's still in the harbor but no longer actively sailing.",
            Verb::Rm => "🗑️ Removing a container is like decommissioning a ship. Once removed, it leaves the harbor completely.",
            Verb::Images => "📦 Listing images is like reviewing all ship blueprints available in your shipyard. Each blueprint can create many ships.",
            Verb::Pull => "📥 Pulling an image is like downloading a new ship blueprint from the central shipyard registry (Docker Hub).",
            Verb::Start => "⛵ Starting a stopped container is like setting a docked ship back into motion.",
            Verb::Restart => "🔄 Restarting a container is like bringing a ship back to dock and immediately sending it out again.",
            Verb::Logs => "📜 Viewing logs is like reading a ship's logbook to see what happened during its journey.",
            Verb::Inspect => "🔍 Inspecting shows detailed information about a ship (container) or blueprint (image).",
            Verb::Build => "🏗️ Building an image is like constructing a new ship blueprint from specifications.",
        }
    }

    /// Base status line for a matched command, before flag annotations.
    pub fn success_message(self, target: &str) -> String {
        match self {
            Verb::Run => format!("✅ Launching container from image '{}'", target),
            Verb::Ps => "✅ Listing containers in your harbor".to_string(),
            Verb::Stop => format!("✅ Anchoring container '{}'", target),
            Verb::Rm => format!("✅ Removing container '{}' from harbor", target),
            Verb::Images => "✅ Showing available ship blueprints".to_string(),
            Verb::Pull => format!("✅ Downloading image '{}' from registry", target),
            Verb::Start => format!("✅ Starting container '{}'", target),
            Verb::Restart => format!("✅ Restarting container '{}'", target),
            Verb::Logs => format!("✅ Reading logbook of '{}'", target),
            Verb::Inspect => format!("✅ Inspecting '{}'", target),
            Verb::Build => format!("✅ Building image from '{}'", target),
        }
    }
}

impl Verb {
    /// One-line synopsis of the shapes the grammar accepts for this verb.
    pub fn usage(self) -> &'static str {
        match self {
            Verb::Run => "docker run [-d] [-p HOST:CONTAINER] [--name NAME] IMAGE [COMMAND]",
            Verb::Ps => "docker ps [-a]",
            Verb::Stop => "docker stop CONTAINER",
            Verb::Rm => "docker rm [-f] CONTAINER",
            Verb::Images => "docker images [-a]",
            Verb::Pull => "docker pull IMAGE",
            Verb::Start => "docker start CONTAINER",
            Verb::Restart => "docker restart CONTAINER",
            Verb::Logs => "docker logs [-f] CONTAINER",
            Verb::Inspect => "docker inspect CONTAINER|IMAGE",
            Verb::Build => "docker build [-t TAG] PATH",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the grammar table.
pub struct GrammarEntry {
    pub verb: Verb,
    pub pattern: Regex,
    /// Name of the capture group holding the operand, if the verb takes one.
    pub operand: Option<&'static str>,
}

// Flag shapes accepted in front of the image for `docker run`. Value-taking
// flags come first so `-p 80:80` is not read as a bare switch.
const RUN_FLAGS: &str = concat!(
    r"(?:--[a-z-]+=\S+\s+",
    r"|--(?:name|publish|env|volume|network|hostname|workdir|user)\s+\S+\s+",
    r"|--[a-z-]+\s+",
    r"|-[pevwuh]\s+\S+\s+",
    r"|-[a-z]+\s+)*"
);

fn entry(verb: Verb, body: &str, operand: Option<&'static str>) -> GrammarEntry {
    let source = format!(r"(?i)^docker\s+{}$", body);
    GrammarEntry {
        verb,
        pattern: Regex::new(&source).expect("grammar pattern must compile"),
        operand,
    }
}

static GRAMMAR: LazyLock<Vec<GrammarEntry>> = LazyLock::new(|| {
    vec![
        entry(
            Verb::Run,
            &format!(r"run\s+(?P<flags>{})?(?P<image>\S+)(?:\s+(?P<command>.+))?", RUN_FLAGS),
            Some("image"),
        ),
        entry(Verb::Ps, r"ps(?:\s+(?P<flags>-a|-all|--all))?", None),
        entry(Verb::Stop, r"stop\s+(?P<container>\S+)", Some("container")),
        entry(Verb::Rm, r"rm\s+(?P<flags>(?:-f|--force)\s+)?(?P<container>\S+)", Some("container")),
        entry(Verb::Images, r"images(?:\s+(?P<flags>-a|--all))?", None),
        entry(Verb::Pull, r"pull\s+(?P<image>\S+)", Some("image")),
        entry(Verb::Start, r"start\s+(?P<container>\S+)", Some("container")),
        entry(Verb::Restart, r"restart\s+(?P<container>\S+)", Some("container")),
        entry(Verb::Logs, r"logs\s+(?P<flags>-f\s+)?(?P<container>\S+)", Some("container")),
        entry(Verb::Inspect, r"inspect\s+(?P<target>\S+)", Some("target")),
        entry(
            Verb::Build,
            r"build\s+(?P<flags>(?:-t(?:\s+|=)\S+\s+|--tag(?:\s+|=)\S+\s+)*)?(?P<path>\S+)",
            Some("path"),
        ),
    ]
});

/// The grammar table, scanned front to back; the first matching entry wins.
pub fn grammar() -> &'static [GrammarEntry] {
    &GRAMMAR
}

/// Comma separated list of every supported verb.
pub fn supported_verbs() -> String {
    Verb::ALL
        .iter()
        .map(|v| v.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
