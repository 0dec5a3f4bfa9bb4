//! Version command implementation

pub fn execute() {
    println!("nsjoin {}", env!("CARGO_PKG_VERSION"));
    println!("Delegated program: {}", nsjoin_nsenter::DEFAULT_PROGRAM);
    println!();
    println!("Namespaces:");
    println!("  cgroup, ipc, mnt, net, pid, user, uts");
}
