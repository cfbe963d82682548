use sysinfo::{ProcessesToUpdate, System};

/// Resolves a process name to a pid.
pub trait ProcessFinder: Send + Sync {
    fn find_pid(&self, name: &str) -> Option<u32>;
}

/// Looks the name up in the OS process table.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessFinder;

impl ProcessFinder for SystemProcessFinder {
    fn find_pid(&self, name: &str) -> Option<u32> {
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::All, true);

        find_matching_pid(
            sys.processes()
                .iter()
                .map(|(pid, process)| (pid.as_u32(), process.name().to_str())),
            name,
        )
    }
}

/// Case-insensitive name match over `(pid, name)` entries.
///
/// Entries whose name could not be read are skipped. The lowest matching pid wins.
pub fn find_matching_pid<'a, I>(entries: I, name: &str) -> Option<u32>
where
    I: IntoIterator<Item = (u32, Option<&'a str>)>,
{
    let wanted = name.to_lowercase();

    entries
        .into_iter()
        .filter_map(|(pid, entry)| entry.map(|entry| (pid, entry)))
        .filter(|(_, entry)| entry.to_lowercase() == wanted)
        .map(|(pid, _)| pid)
        .min()
}
