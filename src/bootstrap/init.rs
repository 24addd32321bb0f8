//! The `init` flow: make sure the bootstrap stack exists and print the CI
//! secrets and variables it produced

use crate::aws::AwsExecutor;
use crate::bootstrap::postfix::{derive_postfix, deployment_seed};
use crate::bootstrap::repo::validate_repo_name;
use crate::bootstrap::stack::{BootstrapStack, UpdateOutcome};
use crate::bootstrap::template::{render_template, OUTPUT_ACCESS_KEY_ID, OUTPUT_SECRET_ACCESS_KEY};
use crate::core::config::PolgenConfig;
use crate::core::error::Result;
use std::io::{self, BufRead, Write};

/// Interactive questions asked during init
pub trait Prompt {
    /// Yes/no question, defaulting to no
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Free-text question
    fn input(&mut self, question: &str) -> Result<String>;
}

/// Asks on stdout and reads answers from stdin
pub struct StdinPrompt;

impl StdinPrompt {
    fn read_line(question: &str) -> Result<String> {
        print!("{question} ");
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim().to_string())
    }
}

impl Prompt for StdinPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = Self::read_line(&format!("{question} (y/N)"))?;
        Ok(is_yes(&answer))
    }

    fn input(&mut self, question: &str) -> Result<String> {
        Self::read_line(question)
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// `owner/repo`; asked for when absent
    pub repo: Option<String>,
    /// Deployment branch; asked for when absent
    pub branch: Option<String>,
    /// Answer yes to every confirmation
    pub assume_yes: bool,
}

/// What init did to the bootstrap stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackAction {
    Created,
    Updated,
    UpToDate,
    /// The user declined to create or update
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitSummary {
    pub repo: String,
    pub branch: String,
    pub postfix: String,
    pub action: StackAction,
}

/// Resolve repository and branch, then bootstrap through `executor`
pub fn run_init(
    executor: &AwsExecutor,
    config: &PolgenConfig,
    options: &InitOptions,
    prompt: &mut dyn Prompt,
    out: &mut dyn Write,
) -> Result<InitSummary> {
    let repo = match &options.repo {
        Some(repo) => repo.clone(),
        None => {
            writeln!(out, "Unable to get git repo name. Are you running this in a git cloned repo directory?")?;
            prompt.input("Please enter the GitHub repo name in the format \"<user/company name>/<repo name>\"")?
        }
    };
    validate_repo_name(&repo)?;

    let branch = match &options.branch {
        Some(branch) => branch.clone(),
        None => prompt.input(&format!(
            "Which branch will you use to deploy? ({})",
            config.default_branch
        ))?,
    };
    let branch = if branch.trim().is_empty() {
        config.default_branch.clone()
    } else {
        branch.trim().to_string()
    };

    let postfix = derive_postfix(&deployment_seed(&repo, &branch));
    tracing::debug!("Postfix for {}/{}: {}", repo, branch, postfix);

    let action = bootstrap(executor, config, &postfix, options.assume_yes, prompt, out)?;
    writeln!(out, "PolGen init done.")?;

    Ok(InitSummary {
        repo,
        branch,
        postfix,
        action,
    })
}

fn bootstrap(
    executor: &AwsExecutor,
    config: &PolgenConfig,
    postfix: &str,
    assume_yes: bool,
    prompt: &mut dyn Prompt,
    out: &mut dyn Write,
) -> Result<StackAction> {
    let mut confirm = |question: &str| -> Result<bool> {
        if assume_yes {
            return Ok(true);
        }
        prompt.confirm(question)
    };

    let account_id = executor.account_id()?;
    let stack = BootstrapStack::new(executor, config, postfix);

    let action = match stack.describe()? {
        Some(existing) => {
            writeln!(out, "Bootstrap stack exists.")?;
            if confirm("Update stack?")? {
                writeln!(out, "Updating stack...")?;
                match stack.update(&existing, true)? {
                    UpdateOutcome::Updated => StackAction::Updated,
                    UpdateOutcome::UpToDate => {
                        writeln!(out, "Stack is up to date")?;
                        StackAction::UpToDate
                    }
                }
            } else {
                writeln!(out, "Skipping stack update...")?;
                StackAction::Skipped
            }
        }
        None => {
            writeln!(out, "Bootstrap stack does not exist.")?;
            if confirm(&format!("Create a new bootstrap stack in account {account_id}?"))? {
                writeln!(out, "Creating a new bootstrap stack...")?;
                stack.create(true)?;
                StackAction::Created
            } else {
                writeln!(out, "Skipping stack creation; nothing to configure.")?;
                return Ok(StackAction::Skipped);
            }
        }
    };

    let current = stack.require()?;
    let access_key_id = current.output(OUTPUT_ACCESS_KEY_ID)?;
    let secret_access_key = current.output(OUTPUT_SECRET_ACCESS_KEY)?;
    let region = executor.region()?;

    writeln!(out, "Create or update the following GitHub secret:")?;
    writeln!(out)?;
    writeln!(out, "  AWS_SECRET_ACCESS_KEY: {secret_access_key}")?;
    writeln!(out)?;
    writeln!(out, "Create or update the following GitHub variables:")?;
    writeln!(out)?;
    writeln!(out, "  AWS_ACCESS_KEY_ID: {access_key_id}")?;
    writeln!(out, "  AWS_REGION: {region}")?;
    writeln!(out)?;
    Ok(action)
}

/// Instructions for creating the stack by hand
pub fn print_manual_instructions(postfix: &str, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Unable to automatically interface with AWS because neither the AWS SDK nor the AWS CLI is available.")?;
    writeln!(out, "Use the following CloudFormation template to create or update your stack manually:")?;
    writeln!(out, "{}", render_template(postfix))?;
    writeln!(out, "Then create/update the following GitHub secret with the Output from the Stack:")?;
    writeln!(out)?;
    writeln!(out, "  AWS_SECRET_ACCESS_KEY")?;
    writeln!(out)?;
    writeln!(out, "And also create/update the following GitHub variables with the Output from the Stack:")?;
    writeln!(out)?;
    writeln!(out, "  AWS_ACCESS_KEY_ID")?;
    writeln!(out, "  AWS_REGION")?;
    writeln!(out)?;
    Ok(())
}
