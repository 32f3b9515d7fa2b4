use chrono::{DateTime, TimeZone, Utc};
use tracing::info;

use super::{KnowledgeBase, new_id};
use crate::error::Result;
use crate::models::{Distro, Issue};

struct SampleIssue {
    title: &'static str,
    description: &'static str,
    distro: Distro,
    category: &'static str,
    tags: &'static [&'static str],
    steps_to_fix: &'static str,
    commands: &'static [&'static str],
    upvotes: u32,
    day: u32,
}

const SAMPLES: &[SampleIssue] = &[
    SampleIssue {
        title: "No sound after a fresh Ubuntu 22.04 install",
        description: "Speakers are not detected and the output device list is empty.",
        distro: Distro::Ubuntu,
        category: "Audio",
        tags: &["audio", "pulseaudio", "alsa"],
        steps_to_fix: "1. Confirm the card is detected\n2. Restart the sound server\n3. Unmute channels in alsamixer",
        commands: &["aplay -l", "systemctl --user restart pulseaudio", "alsamixer"],
        upvotes: 24,
        day: 20,
    },
    SampleIssue {
        title: "WiFi adapter found but never connects on Arch",
        description: "The interface shows up, scans work, association always times out.",
        distro: Distro::Arch,
        category: "Networking",
        tags: &["wifi", "network", "driver"],
        steps_to_fix: "1. Check for a soft or hard block\n2. Confirm the driver module is loaded\n3. Restart NetworkManager and reconnect",
        commands: &["rfkill list", "lsmod | grep -i iwl", "systemctl restart NetworkManager"],
        upvotes: 18,
        day: 19,
    },
    SampleIssue {
        title: "Boot stops at the GRUB menu on Fedora",
        description: "The machine sits at GRUB and never hands off to the kernel.",
        distro: Distro::Fedora,
        category: "Boot Issues",
        tags: &["grub", "boot", "kernel"],
        steps_to_fix: "1. Edit the boot entry from the GRUB menu\n2. Drop quiet and rhgb to see kernel output\n3. Regenerate the GRUB configuration",
        commands: &["journalctl -b -1", "grub2-mkconfig -o /boot/grub2/grub.cfg"],
        upvotes: 12,
        day: 18,
    },
    SampleIssue {
        title: "apt reports the dpkg lock is held on Debian",
        description: "Package installs fail because another process holds the lock.",
        distro: Distro::Debian,
        category: "Package Management",
        tags: &["apt", "dpkg", "lock"],
        steps_to_fix: "1. Let unattended upgrades finish\n2. Remove a stale lock only when no apt process runs\n3. Refresh indexes and repair dependencies",
        commands: &["ps aux | grep -i apt", "sudo apt update", "sudo apt install -f"],
        upvotes: 31,
        day: 17,
    },
    SampleIssue {
        title: "Screen tearing with the proprietary NVIDIA driver",
        description: "Windows tear while scrolling or dragging on an X11 session.",
        distro: Distro::Ubuntu,
        category: "Display",
        tags: &["nvidia", "display", "vsync"],
        steps_to_fix: "1. Open NVIDIA settings\n2. Enable the full composition pipeline\n3. Restart the X session",
        commands: &["nvidia-settings", "xrandr --query"],
        upvotes: 22,
        day: 16,
    },
    SampleIssue {
        title: "Journal fills the root partition",
        description: "systemd-journald keeps growing until / runs out of space.",
        distro: Distro::Other,
        category: "System Errors",
        tags: &["systemd", "journald", "disk"],
        steps_to_fix: "1. Check how much space the journal uses\n2. Vacuum old entries\n3. Cap SystemMaxUse in journald.conf",
        commands: &["journalctl --disk-usage", "sudo journalctl --vacuum-size=200M"],
        upvotes: 9,
        day: 15,
    },
];

fn sample_date(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, day, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn sample_issue(sample: &SampleIssue) -> Issue {
    Issue {
        id: new_id(),
        title: sample.title.to_string(),
        description: sample.description.to_string(),
        distro: sample.distro,
        category: sample.category.to_string(),
        tags: sample.tags.iter().map(ToString::to_string).collect(),
        steps_to_fix: sample.steps_to_fix.to_string(),
        commands: sample.commands.iter().map(ToString::to_string).collect(),
        upvotes: sample.upvotes,
        created_at: sample_date(sample.day),
    }
}

impl KnowledgeBase {
    /// Loads the sample catalogue into an empty store and returns how many issues were added.
    /// A store that already holds issues is left untouched.
    pub fn seed_samples(&self) -> Result<usize> {
        let existing = self.storage().count_issues()?;
        if existing > 0 {
            info!(existing, "seed skipped, store already has issues");
            return Ok(0);
        }
        for sample in SAMPLES {
            self.storage().insert_issue(&sample_issue(sample))?;
        }
        info!(count = SAMPLES.len(), "sample issues seeded");
        Ok(SAMPLES.len())
    }
}
