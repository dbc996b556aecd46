use std::env;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use allocation_cell::{bed_display_name, room_display_name, AvailabilityService, RoomService};
use appointment_cell::{
    search_and_sort, Appointment, DirectoryService, Editor, SortKey, VisibilityService,
};
use report_cell::{ReportFilters, ReportService};
use session_cell::{Credentials, SessionService};
use shared_config::AppConfig;
use shared_gateway::BackendClient;
use shared_models::ApiError;
use shared_utils::format::{format_cpf, title_case};
use user_cell::UserService;

const USAGE: &str = "\
uso: abrigo-console <comando>

  list [termo] [name-asc|name-desc|date-asc|date-desc]
  show <id>
  edit <id> <campo> <valor>     campos: observation, room, bed
  hide <id> | unhide <id>
  availability
  reports
  users

Credenciais via SHELTER_USERNAME / SHELTER_PASSWORD.";

pub async fn dispatch(
    config: &AppConfig,
    client: &BackendClient,
    args: &[String],
) -> Result<(), ApiError> {
    let Some(command) = args.first() else {
        println!("{USAGE}");
        return Ok(());
    };

    ensure_session(client).await;

    match command.as_str() {
        "list" => list(config, client, args.get(1), args.get(2)).await,
        "show" => show(config, client, parse_id(args.get(1))?).await,
        "edit" => {
            let id = parse_id(args.get(1))?;
            let field = args.get(2).cloned().unwrap_or_default();
            let value = args.get(3).cloned().unwrap_or_default();
            edit(config, client, id, &field, &value).await
        }
        "hide" => toggle(config, client, parse_id(args.get(1))?, true).await,
        "unhide" => toggle(config, client, parse_id(args.get(1))?, false).await,
        "availability" => availability(config, client).await,
        "reports" => reports(client).await,
        "users" => users(client).await,
        other => {
            println!("comando desconhecido: {other}\n\n{USAGE}");
            Ok(())
        }
    }
}

/// Logs in with the environment credentials when present. Read-only
/// commands may still work unauthenticated against permissive backends, so
/// missing credentials only warn.
async fn ensure_session(client: &BackendClient) {
    if client.session().is_authenticated() {
        return;
    }

    let (Ok(username), Ok(password)) = (
        env::var("SHELTER_USERNAME"),
        env::var("SHELTER_PASSWORD"),
    ) else {
        warn!("SHELTER_USERNAME/SHELTER_PASSWORD not set, proceeding unauthenticated");
        return;
    };

    let sessions = SessionService::new(client.clone());
    if let Err(err) = sessions.login(&Credentials { username, password }).await {
        warn!("login failed: {}", err.user_message());
    }
}

async fn list(
    config: &AppConfig,
    client: &BackendClient,
    term: Option<&String>,
    sort: Option<&String>,
) -> Result<(), ApiError> {
    let directory = DirectoryService::new(client.clone(), config).load().await?;
    let key = sort
        .and_then(|selector| SortKey::parse(selector))
        .unwrap_or_default();
    let term = term.map(String::as_str).unwrap_or("");

    let rooms = RoomService::new(client.clone()).rooms().await.unwrap_or_default();
    let entries = search_and_sort(&directory, term, key);

    println!("{} acolhimento(s)", entries.len());
    for entry in entries {
        let info = entry.info();
        println!(
            "#{:<4} {:<30} {:<14} {:<10} {:<10} {}{}",
            entry.id,
            title_case(&entry.full_name()),
            format_cpf(&entry.cpf),
            entry.arrival_date,
            room_display_name(&rooms, info.and_then(|i| i.room_id)),
            bed_display_name(info.and_then(|i| i.bed_id)),
            if entry.is_hidden { "  [oculto]" } else { "" },
        );
    }
    Ok(())
}

async fn show(config: &AppConfig, client: &BackendClient, id: i64) -> Result<(), ApiError> {
    let directory = DirectoryService::new(client.clone(), config).load().await?;
    let Some(entry) = directory.get(id) else {
        return Err(ApiError::NotFound(format!("acolhimento {id}")));
    };
    print_appointment(entry);
    Ok(())
}

async fn edit(
    config: &AppConfig,
    client: &BackendClient,
    id: i64,
    field: &str,
    value: &str,
) -> Result<(), ApiError> {
    let cancel = CancellationToken::new();
    let mut editor = Editor::load(client.clone(), config, id, cancel).await?;

    match field {
        "observation" => editor.appointment.observation = value.to_string(),
        "room" => {
            let room_id = value.parse().map_err(|_| invalid_argument("quarto"))?;
            editor.select_room(room_id).await;
        }
        "bed" => {
            let bed_id = value.parse().map_err(|_| invalid_argument("cama"))?;
            editor.assign_bed(bed_id);
        }
        other => {
            println!("campo desconhecido: {other}");
            return Ok(());
        }
    }

    editor.save().await?;
    println!("Agendamento atualizado com sucesso!");
    Ok(())
}

async fn toggle(
    config: &AppConfig,
    client: &BackendClient,
    id: i64,
    hidden: bool,
) -> Result<(), ApiError> {
    let mut directory = DirectoryService::new(client.clone(), config).load().await?;
    let visibility = VisibilityService::new(client.clone());

    if hidden {
        visibility.hide(&mut directory, id).await?;
        println!("Acolhimento {id} ocultado.");
    } else {
        visibility.unhide(&mut directory, id).await?;
        println!("Acolhimento {id} visível novamente.");
    }

    // Hiding frees a bed (and unhiding takes one back), so the tally is
    // recomputed from the updated collection.
    let summary = AvailabilityService::new(client.clone(), config)
        .summary(&directory.occupants())
        .await;
    println!("Vagas disponíveis: {}", summary.total_available);
    Ok(())
}

async fn availability(config: &AppConfig, client: &BackendClient) -> Result<(), ApiError> {
    let service = AvailabilityService::new(client.clone(), config);
    // An empty collection makes the reconciler reload it remotely first.
    let summary = service.summary(&[]).await;

    for room in &summary.rooms {
        println!(
            "{:<12} ocupadas {}/{}  livres {}",
            room.room_name, room.occupied, room.capacity, room.available
        );
    }
    println!("Total de vagas disponíveis: {}", summary.total_available);
    Ok(())
}

async fn reports(client: &BackendClient) -> Result<(), ApiError> {
    let service = ReportService::new(client.clone());
    let overview = service.overview(&ReportFilters::default()).await?;

    println!("Camas ocupadas por quarto:");
    for (room, count) in &overview.bed_counts {
        println!("  {room}: {count}");
    }
    println!("Por gênero:");
    for entry in &overview.gender_counts {
        println!("  {}: {}", entry.gender, entry.count);
    }
    println!("Por faixa etária:");
    for entry in &overview.age_counts {
        println!("  {}: {}", entry.group, entry.count);
    }
    println!("Por turno:");
    for entry in ReportService::shift_counts(&overview.time_data, None) {
        println!("  {}: {}", entry.shift.label(), entry.count);
    }
    Ok(())
}

async fn users(client: &BackendClient) -> Result<(), ApiError> {
    let service = UserService::new(client.clone());
    for user in service.list().await? {
        println!("#{:<4} {:<25} {:<30} {}", user.id, user.name, user.email, user.role);
    }
    Ok(())
}

fn print_appointment(entry: &Appointment) {
    println!("#{} {}", entry.id, title_case(&entry.full_name()));
    println!("  CPF:       {}", format_cpf(&entry.cpf));
    println!("  Gênero:    {}", entry.gender);
    println!("  Chegada:   {} {}", entry.arrival_date, entry.time);
    println!("  Origem:    {} / {}", entry.city, entry.state);
    if let Some(info) = entry.info() {
        println!(
            "  Alocação:  quarto {:?}, cama {:?}",
            info.room_id, info.bed_id
        );
        if !info.nationality.is_empty() {
            println!("  Nacionalidade: {}", info.nationality);
        }
    }
    if entry.is_hidden {
        println!("  [registro oculto]");
    }
}

fn parse_id(arg: Option<&String>) -> Result<i64, ApiError> {
    arg.and_then(|raw| raw.parse().ok())
        .ok_or_else(|| invalid_argument("id"))
}

fn invalid_argument(field: &str) -> ApiError {
    ApiError::Validation {
        field: field.to_string(),
        message: format!("Informe um valor numérico para {field}."),
    }
}
