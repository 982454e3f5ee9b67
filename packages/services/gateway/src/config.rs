//! 게이트웨이 설정

use std::env;
use std::path::PathBuf;

/// 게이트웨이 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 엔티티 티어 포트
    pub basic_port: u16,

    /// 인증 티어 포트
    pub auth_port: u16,

    /// 자격 증명 테이블 이름
    pub auth_table: String,

    /// 토큰으로 접근을 제어하는 데이터 테이블 이름
    pub data_table: String,

    /// 토큰 서명 키 (없으면 프로세스마다 랜덤)
    pub signing_key: Option<String>,

    /// 시작 시 적재할 YAML 시드 파일
    pub seed_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            basic_port: 34568,
            auth_port: 34570,
            auth_table: "AuthTable".to_string(),
            data_table: "DataTable".to_string(),
            signing_key: None,
            seed_file: None,
        }
    }
}

impl Config {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            basic_port: env::var("TG_BASIC_PORT")
                .unwrap_or_else(|_| defaults.basic_port.to_string())
                .parse()?,

            auth_port: env::var("TG_AUTH_PORT")
                .unwrap_or_else(|_| defaults.auth_port.to_string())
                .parse()?,

            auth_table: env::var("TG_AUTH_TABLE").unwrap_or(defaults.auth_table),

            data_table: env::var("TG_DATA_TABLE").unwrap_or(defaults.data_table),

            signing_key: env::var("TG_SIGNING_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),

            seed_file: env::var("TG_SEED_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// 로그 출력용 (서명 키 가림)
    pub fn redacted(&self) -> Self {
        Self {
            signing_key: self.signing_key.as_ref().map(|_| "<redacted>".to_string()),
            ..self.clone()
        }
    }
}
