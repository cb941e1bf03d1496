use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::*;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    println!("{}", "🚛 Fleet Maintenance Seeding Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL no está configurada")?;

    println!("{}", "🔌 Conectando a la base de datos...".bright_cyan());
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("No se pudo conectar a la base de datos")?;
    println!("{}", "✅ Conexión establecida".bright_green());
    println!();

    create_schema(&pool).await?;
    clear_tables(&pool).await?;
    insert_sample_data(&pool).await?;
    verify(&pool).await?;

    println!();
    println!("{}", "🎉 ¡Datos de ejemplo cargados!".bright_green().bold());
    Ok(())
}

async fn create_schema(pool: &PgPool) -> Result<()> {
    println!("{}", "🏗️ Creando esquema...".bright_cyan().bold());

    let statements = [
        r#"CREATE TABLE IF NOT EXISTS tuserunit (
            userunit_id INTEGER PRIMARY KEY,
            userunit_name TEXT NOT NULL,
            userunit_address TEXT,
            userunit_remarks TEXT,
            uu_loc INTEGER,
            password TEXT,
            movedout BOOLEAN NOT NULL DEFAULT FALSE
        )"#,
        r#"CREATE TABLE IF NOT EXISTS tsubcat (
            subcatid INTEGER PRIMARY KEY,
            subcategoryname TEXT NOT NULL,
            categoryname TEXT NOT NULL,
            subcategorycode TEXT,
            mothersection INTEGER,
            remarks TEXT,
            oemname TEXT
        )"#,
        r#"CREATE TABLE IF NOT EXISTS tfaults (
            faultid INTEGER PRIMARY KEY,
            subcatcode INTEGER,
            refsubsystem INTEGER,
            faultcode INTEGER,
            faultnumber TEXT,
            faults TEXT NOT NULL,
            repairtimeh INTEGER,
            repairtimem INTEGER,
            remarks TEXT,
            nooftrademen INTEGER,
            workdone TEXT,
            critical INTEGER NOT NULL DEFAULT 0
        )"#,
        r#"CREATE TABLE IF NOT EXISTS teqptrecord (
            id INTEGER PRIMARY KEY,
            erid TEXT,
            cat INTEGER REFERENCES tsubcat(subcatid),
            eqptstatus INTEGER,
            eqptfunctionalstatus INTEGER,
            userunit INTEGER REFERENCES tuserunit(userunit_id),
            issuetype INTEGER,
            datedataentry DATE,
            code INTEGER,
            regnno TEXT NOT NULL,
            nomenclature TEXT,
            dtofissue DATE,
            inkm TEXT
        )"#,
        r#"CREATE TABLE IF NOT EXISTS jobcard (
            id INTEGER PRIMARY KEY,
            jobcardno TEXT NOT NULL,
            jobcarddate DATE NOT NULL,
            referid INTEGER REFERENCES teqptrecord(id),
            wordorderno TEXT,
            wordorderdate DATE,
            dues TEXT,
            inkm INTEGER
        )"#,
        r#"CREATE TABLE IF NOT EXISTS jobcarddetails (
            id INTEGER PRIMARY KEY,
            refjobno INTEGER REFERENCES jobcard(id),
            tcode INTEGER,
            fault INTEGER REFERENCES tfaults(faultid),
            workdone TEXT,
            repairdate DATE,
            timetakenh INTEGER,
            timetakenm INTEGER,
            nooftrademen INTEGER,
            entryclk INTEGER,
            critical INTEGER NOT NULL DEFAULT 0
        )"#,
        r#"CREATE TABLE IF NOT EXISTS tssstockmaster (
            id INTEGER PRIMARY KEY,
            itemname TEXT NOT NULL,
            partno TEXT,
            unit TEXT
        )"#,
        r#"CREATE TABLE IF NOT EXISTS tsstransactionregister (
            id INTEGER PRIMARY KEY,
            refjobid INTEGER REFERENCES jobcard(id),
            partnoid INTEGER REFERENCES tssstockmaster(id),
            issues INTEGER,
            transactiondate DATE
        )"#,
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    println!("{}", "✅ Esquema listo".bright_green());
    Ok(())
}

async fn clear_tables(pool: &PgPool) -> Result<()> {
    println!("{}", "🧹 Limpiando tablas...".bright_cyan().bold());

    // El orden importa por las foreign keys
    let tables = [
        "tsstransactionregister",
        "jobcarddetails",
        "jobcard",
        "teqptrecord",
        "tssstockmaster",
        "tfaults",
        "tsubcat",
        "tuserunit",
    ];

    for table in tables {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(pool)
            .await?;
        println!("   🧹 {}", table);
    }

    Ok(())
}

async fn insert_sample_data(pool: &PgPool) -> Result<()> {
    println!("{}", "🚀 Insertando datos de ejemplo...".bright_cyan().bold());

    // [1/8] Unidades usuarias
    let user_units: [(i32, &str, &str, bool); 5] = [
        (1, "1st Armored Division", "Delhi Cantt", false),
        (2, "2nd Infantry Brigade", "Mumbai Garrison", false),
        (3, "3rd Artillery Regiment", "Pune Base", false),
        (4, "4th Logistics Battalion", "Chennai Station", true),
        (5, "5th Transport Company", "Kolkata Depot", false),
    ];
    for (id, name, address, movedout) in user_units {
        sqlx::query(
            "INSERT INTO tuserunit (userunit_id, userunit_name, userunit_address, uu_loc, movedout)
             VALUES ($1, $2, $3, $1, $4)",
        )
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(movedout)
        .execute(pool)
        .await?;
    }
    println!("   ✅ [1/8] tuserunit: 5 registros");

    // [2/8] Subcategorías (categoría B = vehículos)
    let subcats: [(i32, &str, &str, &str); 5] = [
        (1, "Main Battle Tank", "B", "MBT"),
        (2, "Infantry Fighting Vehicle", "B", "IFV"),
        (3, "Armored Personnel Carrier", "B", "APC"),
        (4, "Self Propelled Artillery", "B", "SPA"),
        (5, "Military Truck", "B", "TRK"),
    ];
    for (id, name, category, code) in subcats {
        sqlx::query(
            "INSERT INTO tsubcat (subcatid, subcategoryname, categoryname, subcategorycode)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(code)
        .execute(pool)
        .await?;
    }
    println!("   ✅ [2/8] tsubcat: 5 registros");

    // [3/8] Catálogo de fallas
    let faults: [(i32, &str, i32); 5] = [
        (1, "Engine overheating", 1),
        (2, "Transmission failure", 1),
        (3, "Brake system failure", 1),
        (4, "Suspension damage", 0),
        (5, "Electrical short circuit", 0),
    ];
    for (id, description, critical) in faults {
        sqlx::query(
            "INSERT INTO tfaults (faultid, faultnumber, faults, critical)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(format!("F{:03}", id))
        .bind(description)
        .bind(critical)
        .execute(pool)
        .await?;
    }
    println!("   ✅ [3/8] tfaults: 5 registros");

    // [4/8] Flota de equipos
    let equipment: [(i32, i32, i32, &str, &str, NaiveDate, &str); 5] = [
        (1, 1, 1, "DEF12345", "T-90 Main Battle Tank", date(2020, 3, 15), "45000"),
        (2, 2, 2, "INF67890", "BMP-2 Infantry Fighting Vehicle", date(2019, 6, 10), "38000"),
        (3, 3, 3, "APC11223", "BTR-80 Armored Personnel Carrier", date(2021, 8, 22), "25000"),
        (4, 4, 4, "ART44556", "2S19 Self Propelled Artillery", date(2018, 12, 5), "52000"),
        (5, 5, 5, "TRK77889", "TATRA Military Truck", date(2022, 1, 30), "78000"),
    ];
    for (id, cat, unit, regnno, nomenclature, issued, inkm) in equipment {
        sqlx::query(
            "INSERT INTO teqptrecord (id, erid, cat, userunit, regnno, nomenclature, dtofissue, inkm)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(id)
        .bind(format!("ER{:03}", id))
        .bind(cat)
        .bind(unit)
        .bind(regnno)
        .bind(nomenclature)
        .bind(issued)
        .bind(inkm)
        .execute(pool)
        .await?;
    }
    println!("   ✅ [4/8] teqptrecord: 5 registros");

    // [5/8] Tarjetas de trabajo
    let jobcards: [(i32, &str, NaiveDate, i32, &str, i32); 5] = [
        (1, "JC001/2023", date(2023, 6, 1), 1, "Maintenance", 45000),
        (2, "JC002/2023", date(2023, 6, 15), 2, "Repair", 38500),
        (3, "JC003/2023", date(2023, 7, 3), 3, "Inspection", 25200),
        (4, "JC004/2023", date(2023, 7, 20), 4, "Overhaul", 52800),
        (5, "JC005/2023", date(2023, 8, 5), 5, "Service", 78500),
    ];
    for (id, jobcardno, jobcarddate, referid, dues, inkm) in jobcards {
        sqlx::query(
            "INSERT INTO jobcard (id, jobcardno, jobcarddate, referid, dues, inkm)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(jobcardno)
        .bind(jobcarddate)
        .bind(referid)
        .bind(dues)
        .bind(inkm)
        .execute(pool)
        .await?;
    }
    println!("   ✅ [5/8] jobcard: 5 registros");

    // [6/8] Detalle de fallas por tarjeta
    let details: [(i32, i32, i32, &str, i32); 6] = [
        (1, 1, 1, "Replaced radiator and coolant system", 1),
        (2, 1, 2, "Serviced transmission", 0),
        (3, 2, 3, "Replaced brake pads and fluid", 1),
        (4, 3, 4, "Repaired front suspension", 0),
        (5, 4, 5, "Fixed electrical wiring", 0),
        (6, 5, 1, "Engine maintenance", 0),
    ];
    for (id, refjobno, fault, workdone, critical) in details {
        sqlx::query(
            "INSERT INTO jobcarddetails (id, refjobno, fault, workdone, critical)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(refjobno)
        .bind(fault)
        .bind(workdone)
        .bind(critical)
        .execute(pool)
        .await?;
    }
    println!("   ✅ [6/8] jobcarddetails: 6 registros");

    // [7/8] Maestro de repuestos
    let stock: [(i32, &str, &str); 5] = [
        (1, "Radiator assembly", "RAD-9001"),
        (2, "Transmission oil 20L", "TRN-2040"),
        (3, "Brake pad set", "BRK-1105"),
        (4, "Suspension spring", "SUS-3302"),
        (5, "Wiring harness", "ELE-7718"),
    ];
    for (id, itemname, partno) in stock {
        sqlx::query(
            "INSERT INTO tssstockmaster (id, itemname, partno, unit)
             VALUES ($1, $2, $3, 'EA')",
        )
        .bind(id)
        .bind(itemname)
        .bind(partno)
        .execute(pool)
        .await?;
    }
    println!("   ✅ [7/8] tssstockmaster: 5 registros");

    // [8/8] Emisiones de repuestos por tarjeta
    let transactions: [(i32, i32, i32, i32, NaiveDate); 6] = [
        (1, 1, 1, 1, date(2023, 6, 2)),
        (2, 1, 2, 1, date(2023, 6, 2)),
        (3, 2, 3, 2, date(2023, 6, 16)),
        (4, 3, 4, 2, date(2023, 7, 4)),
        (5, 4, 5, 1, date(2023, 7, 21)),
        (6, 5, 2, 1, date(2023, 8, 6)),
    ];
    for (id, refjobid, partnoid, issues, txdate) in transactions {
        sqlx::query(
            "INSERT INTO tsstransactionregister (id, refjobid, partnoid, issues, transactiondate)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(refjobid)
        .bind(partnoid)
        .bind(issues)
        .bind(txdate)
        .execute(pool)
        .await?;
    }
    println!("   ✅ [8/8] tsstransactionregister: 6 registros");

    Ok(())
}

async fn verify(pool: &PgPool) -> Result<()> {
    println!();
    println!("{}", "📊 VERIFICACIÓN:".bright_cyan().bold());

    let tables = [
        "tuserunit",
        "tsubcat",
        "tfaults",
        "teqptrecord",
        "jobcard",
        "jobcarddetails",
        "tssstockmaster",
        "tsstransactionregister",
    ];

    for table in tables {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await?;
        println!("   ✅ {}: {} registros", table, count);
    }

    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    // Los literales del dataset de ejemplo son fechas válidas
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
