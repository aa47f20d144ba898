use clap::Args;

use deployer_rollout::{Operator, UpdateRequest};

use crate::settings::Settings;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Name prefix shared by every version of the job
    #[arg(long)]
    pub job_name_base: String,
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
    /// Savepoint target directory (cluster default if unset)
    #[arg(long)]
    pub savepoint_dir: Option<String>,
    /// Start even if some savepoint state has no matching operator
    #[arg(long)]
    pub allow_non_restored_state: bool,
    /// Seconds to wait for the savepoint to complete
    #[arg(long)]
    pub savepoint_wait_secs: Option<u64>,
}

pub async fn update(
    operator: &Operator<'_>,
    settings: &Settings,
    args: UpdateArgs,
) -> anyhow::Result<()> {
    let request = UpdateRequest {
        job_name_base: args.job_name_base,
        local_filename: args.file_name,
        remote_filename: args.remote_file_name,
        entry_class: args.entry_class,
        parallelism: args.parallelism,
        program_args: args.program_args,
        savepoint_dir: settings.savepoint_dir(args.savepoint_dir),
        allow_non_restored_state: args.allow_non_restored_state,
    };

    let result = operator.update(&request).await?;
    println!(
        "✓ Updated {} (new job {})",
        request.job_name_base, result.job_id
    );
    Ok(())
}
