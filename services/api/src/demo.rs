use crate::infra::{
    load_cases_file, parse_date, parse_filter, sample_cases, FilterArg, InMemoryAuthBackend,
    InMemoryListingSource, InMemoryProfileStore,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use ijp_match::error::AppError;
use ijp_match::helpers::format_enumeration;
use ijp_match::workflows::account::{reset_password, AuthEvent, PasswordResetError, RecoveryGate};
use ijp_match::workflows::listings::{Listing, ListingBoard, ListingCard};
use ijp_match::workflows::onboarding::{
    insert_profile_row, AttorneyCredentialsValues, AvailabilityValues, BasicInfoValues,
    FlushOutcome, OnboardingRegistry, OnboardingSession, ProfileToUpload, Role, RolesValues,
    StepForm, StepFormState, StepValues, UserId,
};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Args, Debug, Default)]
pub(crate) struct CasesArgs {
    /// JSON array of listings. Defaults to the built-in sample board.
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
    /// Select an option, as CRITERION=VALUE. Repeat to select several.
    #[arg(long, value_parser = parse_filter)]
    pub(crate) filter: Vec<FilterArg>,
    /// Render cards for the interpretation board.
    #[arg(long)]
    pub(crate) interpretation: bool,
    /// Print the board as JSON instead of text.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date used for form validation (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the password reset portion of the demo.
    #[arg(long)]
    pub(crate) skip_password_reset: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ProfileArgs {
    #[arg(long)]
    pub(crate) first_name: String,
    #[arg(long)]
    pub(crate) last_name: String,
    #[arg(long, default_value_t = 0)]
    pub(crate) hours_per_month: u32,
    #[arg(long, default_value = "USA")]
    pub(crate) country: String,
    #[arg(long, default_value = "")]
    pub(crate) state: String,
    #[arg(long, default_value = "")]
    pub(crate) city: String,
    /// First day available (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    pub(crate) phone_number: String,
}

impl ProfileArgs {
    fn into_row(self, user_id: UserId, today: NaiveDate) -> ProfileToUpload {
        ProfileToUpload {
            user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            hours_per_month: self.hours_per_month,
            country: self.country,
            state: self.state,
            city: self.city,
            start_date: self.start_date.unwrap_or(today),
            availability_description: None,
            phone_number: self.phone_number,
            has_bar_number: None,
            bar_number: None,
            state_barred: None,
            eoir_registered: None,
            legal_credential_comment: None,
            expected_bar_date: None,
        }
    }
}

/// Write a bare profile row, without languages or roles, and print it.
pub(crate) async fn run_profile(args: ProfileArgs) -> Result<(), AppError> {
    let store = InMemoryProfileStore::default();
    let row = args.into_row(UserId(Uuid::new_v4()), Local::now().date_naive());

    match insert_profile_row(&store, row).await {
        Ok(()) => {
            for submission in store.submissions() {
                println!("{}", serde_json::to_string_pretty(&submission.profile)?);
            }
        }
        Err(err) => println!("Profile rejected: {err}"),
    }
    Ok(())
}

pub(crate) async fn run_cases(args: CasesArgs) -> Result<(), AppError> {
    let CasesArgs {
        file,
        filter,
        interpretation,
        json,
    } = args;

    let cases = match file {
        Some(path) => load_cases_file(&path)?,
        None => sample_cases()?,
    };
    let board = filtered_board(cases, filter)?;

    if json {
        let cards: Vec<ListingCard> = board
            .filtered()
            .iter()
            .map(|listing| ListingCard::from_listing(listing, interpretation))
            .collect();
        let payload = serde_json::json!({ "board": board.view(), "cards": cards });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        render_board(&board, interpretation);
    }
    Ok(())
}

fn filtered_board(cases: Vec<Listing>, filter: Vec<FilterArg>) -> Result<ListingBoard, AppError> {
    let mut selections: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for FilterArg { criterion, value } in filter {
        selections.entry(criterion).or_default().insert(value);
    }

    let mut board = ListingBoard::new(cases);
    board.apply_filters(selections)?;
    Ok(board)
}

fn render_board(board: &ListingBoard, interpretation: bool) {
    println!(
        "Showing {} of {} listings",
        board.filtered().len(),
        board.listings().len()
    );
    for criterion in board.criteria() {
        if criterion.is_active() {
            let active: Vec<&String> = criterion.active().iter().collect();
            println!(
                "  {}: {}",
                criterion.placeholder,
                format_enumeration(&active, "or")
            );
        }
    }

    for listing in board.filtered() {
        let card = ListingCard::from_listing(listing, interpretation);
        let marker = if board.selected().map(|s| s.id) == Some(listing.id) {
            '>'
        } else {
            ' '
        };
        println!("{marker} {} [{}]", card.title, card.location);
        if let Some(kind) = card.interpretation_type.filter(|kind| !kind.is_empty()) {
            println!("    {kind}");
        }
        if !card.tags.is_empty() {
            println!("    {}", card.tags.join(" | "));
        }
        if let Some(agency) = &card.agency {
            println!("    Adjudicating Agency: {agency}");
        }
        if let (Some(label), Some(date)) = (card.date_label, &card.date) {
            println!("    {label} {date}");
        }
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    println!("Case board demo");
    let source = InMemoryListingSource::new(sample_cases()?);
    let mut board = ListingBoard::default();
    if !board.refresh(&source).await {
        println!("  Case list unavailable, board left empty");
    }
    board.toggle_option("languages", "Spanish")?;
    render_board(&board, false);

    println!("\nOnboarding demo (attorney who also interprets)");
    run_onboarding(today).await;

    if !args.skip_password_reset {
        println!("\nPassword reset demo");
        run_password_reset().await;
    }

    Ok(())
}

fn form<V: StepValues>(
    session: &OnboardingSession,
    today: NaiveDate,
    values: V,
) -> Box<dyn StepForm> {
    Box::new(StepFormState::<V>::from_view(&session.view(), today).with_values(values))
}

/// Register `step_form` on the current step and move forward, reporting the outcome.
fn complete_step(session: &mut OnboardingSession, step_form: Box<dyn StepForm>) -> bool {
    let result = session
        .register_form(step_form)
        .and_then(|()| session.advance());
    match result {
        Ok(step) => {
            println!("  -> {}", step.name);
            true
        }
        Err(err) => {
            println!("  Step rejected: {err}");
            false
        }
    }
}

async fn run_onboarding(today: NaiveDate) {
    let store = Arc::new(InMemoryProfileStore::default());
    let registry = OnboardingRegistry::new(Arc::clone(&store));
    let (session_id, controller) = registry.open(Some(UserId(Uuid::new_v4())));

    let walked = controller.with_session(|session| {
        let roles = RolesValues {
            roles: [Role::Attorney, Role::Interpreter].into_iter().collect(),
        };
        let step_form = form(session, today, roles);
        if !complete_step(session, step_form) {
            return false;
        }

        let basic_info = BasicInfoValues {
            first_name: "Rosa".to_string(),
            last_name: "Mejia".to_string(),
            country: "USA".to_string(),
            state: "CA".to_string(),
            city: "San Diego".to_string(),
            phone_number: "(619) 555-0110".to_string(),
            can_read: vec!["Spanish".to_string()],
            can_speak: vec!["Spanish".to_string(), "Mam".to_string()],
        };
        let step_form = form(session, today, basic_info);
        if !complete_step(session, step_form) {
            return false;
        }

        let availability = AvailabilityValues {
            hours_per_month: Some(15),
            start_date: Some(today),
            availability_description: Some("Tuesday and Thursday mornings".to_string()),
        };
        let step_form = form(session, today, availability);
        if !complete_step(session, step_form) {
            return false;
        }

        let credentials = AttorneyCredentialsValues {
            has_bar_number: Some(true),
            bar_number: Some("310447".to_string()),
            state_barred: Some("CA".to_string()),
            eoir_registered: Some(true),
            legal_credential_comment: None,
        };
        let step_form = form(session, today, credentials);
        complete_step(session, step_form)
    });

    if !walked {
        return;
    }

    match registry.submit(session_id).await {
        Some(Ok(FlushOutcome::Submitted)) => {
            for submission in store.submissions() {
                let languages: Vec<&str> = submission
                    .languages
                    .iter()
                    .map(|language| language.language_name.as_str())
                    .collect();
                let roles: Vec<&str> = submission.roles.iter().map(|r| r.role.label()).collect();
                println!(
                    "  Profile created for {} {}",
                    submission.profile.first_name, submission.profile.last_name
                );
                println!("  Roles: {}", format_enumeration(&roles, "and"));
                println!("  Languages: {}", format_enumeration(&languages, "and"));
            }
        }
        Some(Ok(FlushOutcome::Skipped)) => println!("  Submission already in progress"),
        Some(Err(err)) => println!("  Submission failed: {err}"),
        None => println!("  Session expired before submission"),
    }
}

async fn run_password_reset() {
    let backend = InMemoryAuthBackend::new("Volunteer#2025");
    let mut gate = RecoveryGate::default();
    gate.observe(AuthEvent::InitialSession);
    gate.observe(AuthEvent::PasswordRecovery);
    if !gate.can_reset() {
        println!("  Reset form unavailable without a recovery link");
        return;
    }

    for (candidate, confirmation) in [
        ("short", "short"),
        ("Volunteer#2025", "Volunteer#2025"),
        ("Interpret#2026", "Interpret#2026"),
    ] {
        match reset_password(&backend, candidate, confirmation).await {
            Ok(path) => {
                println!("  Password updated, redirecting to {path}");
                println!("  Signed in: {}", backend.is_signed_in());
            }
            Err(PasswordResetError::Complexity(unmet)) => {
                let labels: Vec<&str> = unmet.iter().map(|rule| rule.label()).collect();
                println!("  Rejected '{candidate}': {}", labels.join("; "));
            }
            Err(err) => println!("  Rejected '{candidate}': {err}"),
        }
    }
}
