use clap::Args;

use deployer_rollout::Operator;

#[derive(Args, Debug)]
pub struct TerminateArgs {
    /// Name prefix shared by every version of the job
    #[arg(long)]
    pub job_name_base: String,
}

pub async fn terminate(operator: &Operator<'_>, args: TerminateArgs) -> anyhow::Result<()> {
    let job_id = operator.terminate(&args.job_name_base).await?;
    println!("✓ Cancelled job {job_id}");
    Ok(())
}
