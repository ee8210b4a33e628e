//! Physical core detection.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::env::RuntimeEnv;
use crate::error::ResolveError;

const CPUINFO: &str = "/proc/cpuinfo";

/// Number of physical cores of this node, never below 1.
///
/// `NCPUS_FAKE` wins when it parses. Otherwise `/proc/cpuinfo` is read where
/// it exists, and the platform query of `num_cpus` is used elsewhere.
pub fn number_of_physical_cores(env: &RuntimeEnv) -> Result<u32, ResolveError> {
    if let Some(fake) = env.fake_cores() {
        return Ok(fake);
    }

    let cpuinfo = Path::new(CPUINFO);
    if cpuinfo.is_file() {
        let content = fs::read_to_string(cpuinfo).map_err(|e| ResolveError::Io {
            action: "read",
            path: cpuinfo.to_path_buf(),
            source: e,
        })?;
        return count_physical_cores(&content);
    }

    let physical = u32::try_from(num_cpus::get_physical()).unwrap_or(u32::MAX);
    Ok(physical.max(1))
}

/// Count physical cores from a `/proc/cpuinfo` listing.
///
/// Cores are sockets (distinct `physical id`) times `cpu cores`, which must
/// be the same on every socket. Listings without that information (VMs,
/// most ARM kernels) count `processor` entries instead.
pub fn count_physical_cores(cpuinfo: &str) -> Result<u32, ResolveError> {
    let mut processors: u32 = 0;
    let mut sockets = BTreeSet::new();
    let mut cores_per_socket = BTreeSet::new();

    for line in cpuinfo.lines() {
        let Some((key, value)) = line.split_once(':').or_else(|| line.split_once('=')) else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "processor" => processors += 1,
            "physical id" => {
                sockets.insert(value.to_string());
            }
            "cpu cores" => {
                if let Ok(cores) = value.parse::<u32>() {
                    cores_per_socket.insert(cores);
                }
            }
            _ => {}
        }
    }

    if sockets.is_empty() || cores_per_socket.is_empty() {
        return Ok(processors.max(1));
    }
    if cores_per_socket.len() != 1 {
        let seen: Vec<String> = cores_per_socket.iter().map(u32::to_string).collect();
        return Err(ResolveError::inconsistent(format!(
            "inhomogeneous platform: cpu cores per socket differ ({})",
            seen.join(", ")
        )));
    }

    let per_socket = cores_per_socket.into_iter().next().unwrap_or(1);
    let sockets = u32::try_from(sockets.len()).unwrap_or(u32::MAX);
    Ok(sockets.saturating_mul(per_socket).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(processor: u32, socket: u32, cores: u32) -> String {
        format!(
            "processor\t: {processor}\nmodel name\t: Test CPU\nphysical id\t: {socket}\n\
             siblings\t: 8\ncpu cores\t: {cores}\n\n"
        )
    }

    #[test]
    fn two_sockets_with_hyperthreading() {
        // 2 sockets x 4 cores, 16 logical processors
        let listing: String = (0..16).map(|p| entry(p, p / 8, 4)).collect();
        assert_eq!(count_physical_cores(&listing).unwrap(), 8);
    }

    #[test]
    fn listing_without_topology_counts_processors() {
        let listing = "processor : 0\nBogoMIPS : 50.00\n\nprocessor : 1\nBogoMIPS : 50.00\n";
        assert_eq!(count_physical_cores(listing).unwrap(), 2);
    }

    #[test]
    fn empty_listing_floors_at_one() {
        assert_eq!(count_physical_cores("").unwrap(), 1);
    }

    #[test]
    fn inhomogeneous_sockets_are_rejected() {
        let listing = format!("{}{}", entry(0, 0, 4), entry(1, 1, 6));
        let err = count_physical_cores(&listing).unwrap_err();
        assert!(matches!(err, ResolveError::InconsistentValue { .. }));
        assert!(err.to_string().contains("4, 6"));
    }

    #[test]
    fn fake_count_wins() {
        let env = RuntimeEnv::new().with_fake_cores("3");
        assert_eq!(number_of_physical_cores(&env).unwrap(), 3);
    }

    #[test]
    fn detected_count_is_positive() {
        assert!(number_of_physical_cores(&RuntimeEnv::new()).unwrap() >= 1);
    }
}
