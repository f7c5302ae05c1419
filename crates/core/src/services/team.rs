//! About page.

use std::collections::HashMap;

use serde::Serialize;
use shiftedblog_common::AppResult;
use shiftedblog_db::entities::{account, person, skill};
use shiftedblog_db::repositories::TeamRepository;

/// Heading for accounts without a group.
pub const UNGROUPED_ACCOUNTS: &str = "Other";

/// Accounts under one heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountGroup {
    pub name: String,
    pub accounts: Vec<account::Model>,
}

/// Contents of the about page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AboutPage {
    pub person: Option<person::Model>,
    pub skills: Vec<skill::Model>,
    pub account_groups: Vec<AccountGroup>,
}

/// Group accounts by heading, headings in order of first appearance.
#[must_use]
pub fn group_accounts(
    accounts: Vec<account::Model>,
    group_names: &HashMap<i64, String>,
) -> Vec<AccountGroup> {
    let mut groups: Vec<AccountGroup> = Vec::new();

    for account in accounts {
        let name = account
            .group_id
            .and_then(|id| group_names.get(&id))
            .map_or(UNGROUPED_ACCOUNTS, String::as_str);

        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.accounts.push(account),
            None => groups.push(AccountGroup {
                name: name.to_string(),
                accounts: vec![account],
            }),
        }
    }

    groups
}

/// Service for the about page.
#[derive(Clone)]
pub struct TeamService {
    team_repo: TeamRepository,
}

impl TeamService {
    /// Create a new team service.
    #[must_use]
    pub const fn new(team_repo: TeamRepository) -> Self {
        Self { team_repo }
    }

    /// About page of the first person. Empty when nobody is set up.
    pub async fn about(&self) -> AppResult<AboutPage> {
        let Some(person) = self.team_repo.first_person().await? else {
            return Ok(AboutPage::default());
        };

        let skills = self.team_repo.skills_for(person.id).await?;
        let accounts = self.team_repo.accounts_for(person.id).await?;

        let mut group_ids: Vec<i64> = accounts.iter().filter_map(|a| a.group_id).collect();
        group_ids.sort_unstable();
        group_ids.dedup();
        let group_names: HashMap<i64, String> = self
            .team_repo
            .account_groups(&group_ids)
            .await?
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect();

        Ok(AboutPage {
            person: Some(person),
            skills,
            account_groups: group_accounts(accounts, &group_names),
        })
    }
}
