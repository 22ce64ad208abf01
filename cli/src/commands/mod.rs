//! CLI Commands

pub mod config;
pub mod intake;

use clap::Args;
use lead_intake::{
    AddressField, BasicField, BudgetMentioned, BusinessField, ContactField, FormAction, IntakeConfig,
    QualificationUpdate,
};

use crate::config::Config;

/// Resolved settings for one invocation
pub struct Context {
    pub intake: IntakeConfig,
    pub token: Option<String>,
}

impl Context {
    /// Precedence: flag, then environment, then the profile file
    pub fn load(profile: Option<&str>, api_url: Option<&str>, token: Option<String>) -> Result<Self, String> {
        let file = Config::load(profile).unwrap_or_else(|e| {
            tracing::warn!("Config not readable, using defaults: {}", e);
            Config::default()
        });
        let ctx = Self::resolve(&file, api_url, token)?;
        ctx.intake.clone().install();
        Ok(ctx)
    }

    fn resolve(file: &Config, api_url: Option<&str>, token: Option<String>) -> Result<Self, String> {
        let mut intake = IntakeConfig::from_lookup(|key| std::env::var(key).ok().or_else(|| file.lookup(key)));
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            intake = intake.with_api_base(url).map_err(|e| e.to_string())?;
        }
        Ok(Self {
            intake,
            token: token.or_else(|| file.token.clone()),
        })
    }
}

/// Contact given as `NAME,EMAIL[,PHONE[,ROLE]]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactArg {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<String>,
}

fn parse_contact(raw: &str) -> Result<ContactArg, String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if !(2..=4).contains(&parts.len()) {
        return Err(format!("expected NAME,EMAIL[,PHONE[,ROLE]], got {:?}", raw));
    }
    let part = |i: usize| parts.get(i).filter(|p| !p.is_empty()).map(|p| p.to_string());
    Ok(ContactArg {
        full_name: parts[0].to_string(),
        email: parts[1].to_string(),
        phone: part(2),
        role: part(3),
    })
}

/// Draft fields shared by `validate` and `submit`
#[derive(Args, Debug, Default)]
pub struct DraftArgs {
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Expected deal value; currency symbols and separators are accepted
    #[arg(long)]
    pub deal_value: Option<String>,
    /// imported, new, contacted, qualified, proposal_sent, won or lost
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,

    #[arg(long)]
    pub industry: Option<String>,
    #[arg(long)]
    pub employees: Option<String>,
    #[arg(long)]
    pub annual_revenue: Option<String>,
    #[arg(long)]
    pub source: Option<String>,
    /// Owner id; defaults to LEAD_INTAKE_USER_ID
    #[arg(long)]
    pub owner: Option<String>,

    /// NAME,EMAIL[,PHONE[,ROLE]]; repeat for more contacts
    #[arg(long = "contact", value_parser = parse_contact)]
    pub contacts: Vec<ContactArg>,
    /// 1-based position of the primary contact
    #[arg(long)]
    pub primary: Option<usize>,

    #[arg(long)]
    pub problem_identified: bool,
    /// yes, no or unknown
    #[arg(long)]
    pub budget: Option<String>,
    #[arg(long)]
    pub authority_known: bool,
    #[arg(long)]
    pub need_timeline: bool,
    #[arg(long)]
    pub timeline: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl DraftArgs {
    /// Edits that turn a freshly mounted draft into this one
    pub fn into_actions(self) -> Result<Vec<FormAction>, String> {
        let mut actions = Vec::new();

        let basic = [
            (BasicField::CompanyName, self.company),
            (BasicField::Website, self.website),
            (BasicField::Description, self.description),
            (BasicField::ExpectedDealValue, self.deal_value),
            (BasicField::LeadStatus, self.status),
        ];
        for (field, value) in basic {
            if let Some(value) = value {
                actions.push(FormAction::SetBasic { field, value });
            }
        }

        let address = [
            (AddressField::Country, self.country),
            (AddressField::Street, self.street),
            (AddressField::City, self.city),
            (AddressField::State, self.state),
            (AddressField::PostalCode, self.postal_code),
        ];
        for (field, value) in address {
            if let Some(value) = value {
                actions.push(FormAction::SetAddress { field, value });
            }
        }

        let business = [
            (BusinessField::Industry, self.industry),
            (BusinessField::Employees, self.employees),
            (BusinessField::AnnualRevenue, self.annual_revenue),
            (BusinessField::LeadSource, self.source),
            (BusinessField::AssignedTo, self.owner),
        ];
        for (field, value) in business {
            if let Some(value) = value {
                actions.push(FormAction::SetBusiness { field, value });
            }
        }

        let count = self.contacts.len();
        for (index, contact) in self.contacts.into_iter().enumerate() {
            if index > 0 {
                actions.push(FormAction::AddContact);
            }
            let fields = [
                (ContactField::FullName, Some(contact.full_name)),
                (ContactField::Email, Some(contact.email)),
                (ContactField::Phone, contact.phone),
                (ContactField::Role, contact.role),
            ];
            for (field, value) in fields {
                if let Some(value) = value {
                    actions.push(FormAction::UpdateContact { index, field, value });
                }
            }
        }
        if let Some(position) = self.primary {
            if position == 0 || position > count.max(1) {
                return Err(format!("--primary {} is out of range (1..={})", position, count.max(1)));
            }
            actions.push(FormAction::SetPrimaryContact { index: position - 1 });
        }

        let mut qualification = vec![
            QualificationUpdate::ProblemIdentified(self.problem_identified),
            QualificationUpdate::AuthorityKnown(self.authority_known),
            QualificationUpdate::NeedTimeline(self.need_timeline),
        ];
        if let Some(budget) = self.budget {
            let budget: BudgetMentioned = budget.parse().map_err(|e| format!("--budget: {}", e))?;
            qualification.push(QualificationUpdate::BudgetMentioned(budget));
        }
        if let Some(timeline) = self.timeline {
            qualification.push(QualificationUpdate::ExpectedTimeline(timeline));
        }
        if let Some(notes) = self.notes {
            qualification.push(QualificationUpdate::Notes(notes));
        }
        actions.extend(qualification.into_iter().map(|update| FormAction::SetQualification { update }));

        Ok(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contact() {
        let contact = parse_contact("Raj, raj@x.com").unwrap();
        assert_eq!(contact.full_name, "Raj");
        assert_eq!(contact.email, "raj@x.com");
        assert_eq!(contact.phone, None);

        let contact = parse_contact("Raj,raj@x.com,,CTO").unwrap();
        assert_eq!(contact.phone, None);
        assert_eq!(contact.role.as_deref(), Some("CTO"));

        assert!(parse_contact("Raj").is_err());
        assert!(parse_contact("a,b,c,d,e").is_err());
    }

    #[test]
    fn test_actions_for_two_contacts() {
        let args = DraftArgs {
            company: Some("Acme".into()),
            contacts: vec![parse_contact("Raj,raj@x.com").unwrap(), parse_contact("Meera,m@x.com").unwrap()],
            primary: Some(2),
            ..Default::default()
        };
        let actions = args.into_actions().unwrap();

        assert_eq!(
            actions[0],
            FormAction::SetBasic { field: BasicField::CompanyName, value: "Acme".into() }
        );
        assert!(actions.contains(&FormAction::AddContact));
        assert!(actions.contains(&FormAction::SetPrimaryContact { index: 1 }));
    }

    #[test]
    fn test_primary_out_of_range() {
        let args = DraftArgs {
            contacts: vec![parse_contact("Raj,raj@x.com").unwrap()],
            primary: Some(3),
            ..Default::default()
        };
        assert!(args.into_actions().is_err());
    }

    #[test]
    fn test_bad_budget_answer() {
        let args = DraftArgs { budget: Some("maybe".into()), ..Default::default() };
        let err = args.into_actions().unwrap_err();
        assert!(err.contains("maybe"));
    }

    #[test]
    fn test_flag_beats_file() {
        let file = Config {
            api_url: Some("https://file.example.com".into()),
            token: Some("file-token".into()),
            ..Default::default()
        };
        let ctx = Context::resolve(&file, Some("https://flag.example.com"), None).unwrap();
        assert_eq!(ctx.intake.api_base.unwrap().host_str(), Some("flag.example.com"));
        assert_eq!(ctx.token.as_deref(), Some("file-token"));

        let ctx = Context::resolve(&file, None, Some("flag-token".into())).unwrap();
        assert_eq!(ctx.token.as_deref(), Some("flag-token"));
    }
}
