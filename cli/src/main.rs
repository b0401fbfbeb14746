use campus::content::{ContentType, LessonContent, QuizDefinition, QuizQuestion, RawContent};
use campus::model::entity::{
    CourseCreate, CourseEntity, LessonCreate, LessonEntity, UserEntity, UserEntityCreate,
};
use campus::model::{CrudRepository, DatabaseError, DbConnection, ModelManager};
use campus::web::{AuthenticatedUser, UserRole};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the campus DB", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage lessons
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },
}

/// User management
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "user")]
        role: String,
    },
}

/// Course management
#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value = "beginner")]
        difficulty: String,
    },
}

/// Lesson management
#[derive(Subcommand, Debug)]
pub enum LessonCommands {
    /// Text lesson from a Markdown file
    AddText {
        /// Course title to attach the lesson to
        #[arg(long)]
        course_title: String,
        #[arg(long)]
        title: String,
        /// Path to a Markdown file with lesson content
        #[arg(long)]
        file: String,
        #[arg(long)]
        section: Option<String>,
    },
    /// Video lesson pointing at a hosted source
    AddVideo {
        #[arg(long)]
        course_title: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        #[arg(long, default_value_t = 0)]
        duration_minutes: u32,
        #[arg(long)]
        section: Option<String>,
    },
    /// Quiz lesson from a JSON file with the question list
    AddQuiz {
        #[arg(long)]
        course_title: String,
        #[arg(long)]
        title: String,
        /// Path to a JSON file: [{"id":1,"prompt":"...","options":[...,4],"correct_answer":0,"points":10}]
        #[arg(long)]
        file: String,
        #[arg(long, default_value_t = 70)]
        passing_score: u8,
        #[arg(long)]
        time_limit_minutes: Option<u32>,
        #[arg(long)]
        section: Option<String>,
    },
}

async fn course_id_by_title(mm: &ModelManager, title: &str) -> campus::error::AppResult<uuid::Uuid> {
    let id: uuid::Uuid = sqlx::query_scalar("SELECT id FROM courses WHERE title = $1")
        .bind(title)
        .fetch_one(mm.executor())
        .await
        .map_err(DatabaseError::SqlxError)?;
    Ok(id)
}

async fn add_lesson(
    mm: &ModelManager,
    actor: &AuthenticatedUser,
    course_title: &str,
    title: String,
    section: Option<String>,
    kind: ContentType,
    raw: RawContent,
) -> campus::error::AppResult<()> {
    let course_id = course_id_by_title(mm, course_title).await?;

    let content = LessonContent::assemble(kind, raw).unwrap_or_else(|e| {
        eprintln!("Invalid lesson payload: {e}");
        std::process::exit(1);
    });

    let data = LessonCreate::from_content(
        course_id,
        title,
        String::new(),
        section,
        true,
        false,
        &content,
    )
    .map_err(campus::error::AppError::DatabaseError)?;

    let lesson = LessonEntity::create(mm, actor, data).await?;
    println!("Lesson created: {:?}", lesson);
    Ok(())
}

#[tokio::main]
async fn main() -> campus::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let db_con = DbConnection::connect(&std::env::var("DATABASE_URL").unwrap())?;
    let mm = ModelManager::new(db_con);

    // act as the real bootstrap admin so ownership columns reference an
    // existing account
    UserEntity::ensure_bootstrap_admin(&mm).await?;
    let admin_id: uuid::Uuid = sqlx::query_scalar("SELECT id FROM users WHERE username = 'admin'")
        .fetch_one(mm.executor())
        .await
        .map_err(DatabaseError::SqlxError)?;
    let actor = AuthenticatedUser::new(admin_id, UserRole::SuperAdmin);

    match args.command {
        Commands::User { action } => match action {
            UserCommands::Add { username, email, password, role } => {
                let user = UserEntity::create(
                    &mm,
                    &actor,
                    UserEntityCreate {
                        username,
                        email,
                        password_hash: campus::auth::hash_password(&password).unwrap(),
                        full_name: String::new(),
                        role: Some(role),
                    },
                )
                .await?;
                println!("User created: {:?}", user);
            }
        },

        Commands::Course { action } => match action {
            CourseCommands::Add { title, description, category, difficulty } => {
                let course = CourseEntity::create(
                    &mm,
                    &actor,
                    CourseCreate {
                        title,
                        description,
                        category,
                        difficulty,
                        thumbnail_url: None,
                        preview_video_url: None,
                    },
                )
                .await?;
                println!("Course created: {:?}", course);
            }
        },

        Commands::Lesson { action } => match action {
            LessonCommands::AddText { course_title, title, file, section } => {
                let body = std::fs::read_to_string(file)?;
                add_lesson(
                    &mm,
                    &actor,
                    &course_title,
                    title,
                    section,
                    ContentType::Text,
                    RawContent {
                        text_body: Some(body),
                        ..Default::default()
                    },
                )
                .await?;
            }

            LessonCommands::AddVideo {
                course_title,
                title,
                url,
                duration_minutes,
                section,
            } => {
                add_lesson(
                    &mm,
                    &actor,
                    &course_title,
                    title,
                    section,
                    ContentType::Video,
                    RawContent {
                        video_url: Some(url),
                        video_duration_minutes: duration_minutes,
                        ..Default::default()
                    },
                )
                .await?;
            }

            LessonCommands::AddQuiz {
                course_title,
                title,
                file,
                passing_score,
                time_limit_minutes,
                section,
            } => {
                let raw = std::fs::read_to_string(file)?;
                let questions: Vec<QuizQuestion> = serde_json::from_str(&raw).unwrap_or_else(|e| {
                    eprintln!("Invalid quiz file: {e}");
                    std::process::exit(1);
                });

                add_lesson(
                    &mm,
                    &actor,
                    &course_title,
                    title,
                    section,
                    ContentType::Quiz,
                    RawContent {
                        quiz: Some(QuizDefinition {
                            questions,
                            passing_score,
                            time_limit_minutes,
                        }),
                        ..Default::default()
                    },
                )
                .await?;
            }
        },
    }

    Ok(())
}
