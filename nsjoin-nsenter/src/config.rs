//! nsenter configuration

use serde::{Deserialize, Serialize};

use crate::executor::NsenterExecutor;
use nsjoin_core::{ExecutionOutput, Result};

/// Which namespaces of a target process to enter, and how
///
/// Every field's zero value means "disabled" or "use the target's own".
/// In particular `target`, `uid` and `gid` treat `0` as unset: PID 0 can
/// never be targeted and UID/GID 0 can never be requested explicitly.
/// Nothing is validated here; [`compile`](crate::compile) rejects a
/// missing target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    /// PID whose namespaces are entered (required)
    pub target: u32,

    /// Enter cgroup namespace
    pub cgroup: bool,

    /// Set SELinux security context from the target
    pub follow_context: bool,

    /// Enter IPC namespace
    pub ipc: bool,

    /// Enter mount namespace
    pub mount: bool,

    /// Enter network namespace
    pub net: bool,

    /// Do not fork before executing the program
    pub no_fork: bool,

    /// Enter PID namespace
    pub pid: bool,

    /// Keep current UID/GID when entering namespaces
    pub preserve_credentials: bool,

    /// Enter user namespace
    pub user: bool,

    /// Enter UTS namespace
    pub uts: bool,

    /// UID to run the program as (0 = unset)
    pub uid: u32,

    /// GID to run the program as (0 = unset)
    pub gid: u32,

    /// Root directory, empty for the target's root
    pub root_directory: String,

    /// Working directory, empty for the target's working directory
    pub working_directory: String,
}

impl Configuration {
    /// Create a configuration targeting `pid` with everything else disabled
    #[must_use]
    pub fn new(target: u32) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Set target PID
    #[must_use]
    pub const fn with_target(mut self, target: u32) -> Self {
        self.target = target;
        self
    }

    /// Enter cgroup namespace
    #[must_use]
    pub const fn with_cgroup(mut self, enable: bool) -> Self {
        self.cgroup = enable;
        self
    }

    /// Follow the target's SELinux context
    #[must_use]
    pub const fn with_follow_context(mut self, enable: bool) -> Self {
        self.follow_context = enable;
        self
    }

    /// Enter IPC namespace
    #[must_use]
    pub const fn with_ipc(mut self, enable: bool) -> Self {
        self.ipc = enable;
        self
    }

    /// Enter mount namespace
    #[must_use]
    pub const fn with_mount(mut self, enable: bool) -> Self {
        self.mount = enable;
        self
    }

    /// Enter network namespace
    #[must_use]
    pub const fn with_net(mut self, enable: bool) -> Self {
        self.net = enable;
        self
    }

    /// Do not fork before exec
    #[must_use]
    pub const fn with_no_fork(mut self, enable: bool) -> Self {
        self.no_fork = enable;
        self
    }

    /// Enter PID namespace
    #[must_use]
    pub const fn with_pid(mut self, enable: bool) -> Self {
        self.pid = enable;
        self
    }

    /// Keep the caller's UID/GID
    #[must_use]
    pub const fn with_preserve_credentials(mut self, enable: bool) -> Self {
        self.preserve_credentials = enable;
        self
    }

    /// Enter user namespace
    #[must_use]
    pub const fn with_user(mut self, enable: bool) -> Self {
        self.user = enable;
        self
    }

    /// Enter UTS namespace
    #[must_use]
    pub const fn with_uts(mut self, enable: bool) -> Self {
        self.uts = enable;
        self
    }

    /// Set UID (0 clears it)
    #[must_use]
    pub const fn with_uid(mut self, uid: u32) -> Self {
        self.uid = uid;
        self
    }

    /// Set GID (0 clears it)
    #[must_use]
    pub const fn with_gid(mut self, gid: u32) -> Self {
        self.gid = gid;
        self
    }

    /// Set root directory
    #[must_use]
    pub fn with_root_directory(mut self, dir: impl Into<String>) -> Self {
        self.root_directory = dir.into();
        self
    }

    /// Set working directory
    #[must_use]
    pub fn with_working_directory(mut self, dir: impl Into<String>) -> Self {
        self.working_directory = dir.into();
        self
    }

    /// Check if any namespace is joined
    #[must_use]
    pub const fn has_any(&self) -> bool {
        self.cgroup || self.ipc || self.mount || self.net || self.pid || self.user || self.uts
    }

    /// Get list of joined namespace names, as they appear under `/proc/<pid>/ns`
    #[must_use]
    pub fn enabled_namespaces(&self) -> Vec<&'static str> {
        [
            (self.cgroup, "cgroup"),
            (self.ipc, "ipc"),
            (self.mount, "mnt"),
            (self.net, "net"),
            (self.pid, "pid"),
            (self.user, "user"),
            (self.uts, "uts"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect()
    }

    /// Both credential preservation and an explicit UID/GID are requested
    ///
    /// Accepted as is; `nsenter` decides which one wins.
    #[must_use]
    pub const fn has_credential_conflict(&self) -> bool {
        self.preserve_credentials && (self.uid != 0 || self.gid != 0)
    }

    /// Run `program` with `args` inside the target's namespaces using `nsenter`
    /// from `PATH`
    pub fn execute<I, S>(&self, program: &str, args: I) -> Result<ExecutionOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NsenterExecutor::new().execute(self, program, args)
    }
}
