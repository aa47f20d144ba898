use clap::{Args, ValueEnum};

use deployer_client::ControlPlane;
use deployer_core::Job;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

pub async fn list(client: &dyn ControlPlane, args: ListArgs) -> anyhow::Result<()> {
    let jobs = client.list_jobs().await?;

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&jobs)?),
        Format::Text => print!("{}", format_jobs(&jobs)),
    }

    Ok(())
}

fn format_jobs(jobs: &[Job]) -> String {
    let status_width = jobs
        .iter()
        .map(|j| j.status.as_str().len())
        .max()
        .unwrap_or(0)
        .max("STATUS".len());
    let id_width = jobs.iter().map(|j| j.id.len()).max().unwrap_or(0).max("ID".len());

    let mut out = format!("{:<id_width$}  {:<status_width$}  NAME\n", "ID", "STATUS");
    for job in jobs {
        out.push_str(&format!(
            "{:<id_width$}  {:<status_width$}  {}\n",
            job.id,
            job.status.as_str(),
            job.name
        ));
    }
    out
}
