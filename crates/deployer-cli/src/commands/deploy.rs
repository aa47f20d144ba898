use clap::Args;

use deployer_rollout::{DeploySpec, Operator};

#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Local artifact to upload
    #[arg(long)]
    pub file_name: Option<String>,
    /// Artifact already uploaded to the cluster
    #[arg(long)]
    pub remote_file_name: Option<String>,
    #[arg(long)]
    pub entry_class: Option<String>,
    #[arg(long)]
    pub parallelism: Option<u32>,
    #[arg(long)]
    pub program_args: Option<String>,
    /// Savepoint to restore state from
    #[arg(long)]
    pub savepoint_path: Option<String>,
    /// Start even if some savepoint state has no matching operator
    #[arg(long)]
    pub allow_non_restored_state: bool,
}

impl From<DeployArgs> for DeploySpec {
    fn from(args: DeployArgs) -> Self {
        DeploySpec {
            local_filename: args.file_name,
            remote_filename: args.remote_file_name,
            entry_class: args.entry_class,
            parallelism: args.parallelism,
            program_args: args.program_args,
            savepoint_path: args.savepoint_path,
            allow_non_restored_state: args.allow_non_restored_state,
        }
    }
}

pub async fn deploy(operator: &Operator<'_>, args: DeployArgs) -> anyhow::Result<()> {
    let result = operator.deploy(&args.into()).await?;
    println!("✓ Started job {}", result.job_id);
    Ok(())
}
