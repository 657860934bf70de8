#[derive(Debug, Clone)]
pub enum Message {
    // === HABIT MESSAGES ===
    HabitCreated(String),
    HabitUpdated(String),
    HabitDeleted(String),
    HabitsHeader,
    NoHabitsFound,
    NoHabitsMatching(String),
    ConfirmDeleteHabit(String),
    SelectHabit,
    PromptHabitName,
    PromptHabitDescription,
    PromptHabitColor,
    EditingHabit(String),

    // === LOG MESSAGES ===
    LogCreated { habit: String, date: String, completed: bool },
    LogUpdated { habit: String, date: String, completed: bool },
    LogsHeader(String),
    NoLogsForHabit(String),
    NoLogsFound,
    DayHeader(String),
    TodayHeader(String),

    // === WEEK MESSAGES ===
    WeekHeader(String, String),

    // === TEMPLATE MESSAGES ===
    TemplatesHeader,
    NoTemplatesFound,
    TemplateAdopted(String),
    SelectTemplate,

    // === SESSION MESSAGES ===
    PromptUsername,
    PromptPassword,
    PromptPhone,
    LoginSucceeded(String),
    LoginNotConfiguredHint,
    AlreadySignedIn(String),
    LoggedOut,
    NotSignedIn,
    SessionExpired,
    SignedInAs { user: String, since: String },

    // === SHELL MESSAGES ===
    ShellWelcome(String),
    ShellHelp,
    ShellCommandUnavailable(String),
    SessionExpiring(String),
    StayedSignedIn,
    SessionTimedOut,

    // === AI MESSAGES ===
    AiThinking,
    AiAnswerHeader,
    PromptOpenAiKey,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    PromptSelectModules,
    ConfigModuleLogin,
    ConfigModuleSession,
    ConfigModuleAi,
    PromptWarningAfter,
    PromptLogoutAfter,
    PromptDebounce,
    PromptTick,
    PromptAiUrl,
    PromptAiModel,
    PromptAiTemperature,
    PromptAiMaxTokens,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    DatabaseUpToDate,
    DatabaseVersion(u32),
    DatabaseNeedsUpdate,
    MigrationHistory,

    // === GENERIC MESSAGES ===
    OperationCancelled,
}
