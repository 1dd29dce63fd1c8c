//! Canonical example payloads served when the upstream cannot answer.
//!
//! Every function here returns data in exactly the shape the corresponding
//! upstream operation is parsed into, so callers never branch on the source.

use std::collections::BTreeMap;

use super::models::{
    contains_ignore_case, CounselingCase, CounselingDetail, CounselingFilter, Department,
    DepartmentDetail, DepartmentFilter, JobDetail, JobFilter, JobSummary, NamedRef, PsychTest,
    Question, School, SchoolDetail, SchoolFilter, SimilarCase,
};
use crate::profile::models::{today, TestResult};

const LIKERT_OPTIONS: [&str; 5] = ["전혀 아니다", "아니다", "보통이다", "그렇다", "매우 그렇다"];
const RESULT_URL: &str = "https://www.career.go.kr/cnet/front/examen/inspctResult.do";

// ────────────────────────────────────────────────────────────────────────────
// Psychological tests
// ────────────────────────────────────────────────────────────────────────────

pub fn tests() -> Vec<PsychTest> {
    [
        ("1", "직업흥미검사(H)", "직업에 대한 흥미를 측정하여 적합한 직업군 추천"),
        ("2", "직업적성검사", "개인의 적성과 잠재력을 측정하여 적합한 직업 탐색"),
        ("3", "진로성숙도검사", "진로에 대한 준비도와 성숙도 측정"),
        ("4", "직업가치관검사", "직업 선택 시 중요하게 생각하는 가치 측정"),
        ("5", "진로탐색검사", "자신의 진로 방향성 탐색을 위한 검사"),
    ]
    .into_iter()
    .map(|(id, name, description)| PsychTest {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
}

const INTEREST_QUESTIONS: &[&str] = &[
    "새로운 사람을 만나는 것을 좋아한다.",
    "계획을 세우고 그대로 실행하는 것이 중요하다.",
    "문제 해결 시 창의적인 방법을 선호한다.",
    "세부적인 것보다 큰 그림을 보는 것이 좋다.",
    "분석적인 사고를 하는 것을 좋아한다.",
    "다른 사람들과 협력하여 일하는 것이 좋다.",
    "새로운 아이디어를 생각해내는 것을 즐긴다.",
    "규칙과 절차를 따르는 것이 중요하다.",
    "다른 사람을 돕는 일에 보람을 느낀다.",
    "목표를 달성하기 위해 노력하는 것을 좋아한다.",
    "예술적인 활동에 관심이 많다.",
    "복잡한 문제를 해결하는 것이 즐겁다.",
    "다른 사람들을 리드하는 것을 좋아한다.",
    "정확하고 체계적인 일을 선호한다.",
    "자연과 관련된 활동을 즐긴다.",
    "기계나 도구를 다루는 것을 좋아한다.",
    "다른 사람의 감정을 이해하는 것이 중요하다.",
    "새로운 기술을 배우는 것을 즐긴다.",
    "경쟁적인 환경에서 일하는 것을 좋아한다.",
    "세부 사항에 주의를 기울이는 것이 중요하다.",
];

const APTITUDE_QUESTIONS: &[&str] = &[
    "복잡한 계산을 빠르게 할 수 있다.",
    "공간적 관계를 쉽게 이해할 수 있다.",
    "언어적 표현력이 뛰어나다.",
    "손으로 정교한 작업을 하는 것이 능숙하다.",
    "다른 사람의 감정을 잘 파악한다.",
    "논리적으로 문제를 분석하는 것이 좋다.",
    "음악적 리듬과 멜로디를 잘 인식한다.",
    "글쓰기를 통해 생각을 잘 표현한다.",
    "신체적으로 활동적인 일을 좋아한다.",
    "다른 사람을 가르치는 것을 즐긴다.",
    "데이터를 분석하고 패턴을 찾는 것이 좋다.",
    "시각적 디자인에 대한 감각이 있다.",
    "여러 언어를 배우는 것에 관심이 있다.",
    "기계나 전자 장치를 수리하는 것을 좋아한다.",
    "팀을 이끌고 조직하는 능력이 있다.",
    "과학적 실험을 설계하고 수행하는 것을 좋아한다.",
    "창의적인 방식으로 자신을 표현하는 것을 즐긴다.",
    "다양한 주제에 대해 글을 쓰는 것이 좋다.",
    "도구를 사용하여 물건을 만드는 것을 좋아한다.",
    "다른 사람의 문제를 해결하는 데 도움을 주는 것을 좋아한다.",
];

/// Sample questions: test "1" and "2" have their own 20-item sets; any other
/// test gets the first 15 interest items.
pub fn questions(test_id: &str) -> Vec<Question> {
    let texts: &[&str] = match test_id {
        "1" => INTEREST_QUESTIONS,
        "2" => APTITUDE_QUESTIONS,
        _ => &INTEREST_QUESTIONS[..15],
    };

    texts
        .iter()
        .enumerate()
        .map(|(i, text)| Question {
            id: (i + 1).to_string(),
            text: text.to_string(),
            options: LIKERT_OPTIONS.iter().map(|o| o.to_string()).collect(),
        })
        .collect()
}

struct SampleResult {
    summary: &'static str,
    categories: &'static [(&'static str, f64)],
    recommended_jobs: &'static [&'static str],
}

const INTEREST_RESULT: SampleResult = SampleResult {
    summary: "이 검사 결과에 따르면 당신은 창의적이고 분석적인 사고를 가진 '탐구형' 유형에 가깝습니다. \
              탐구형 유형은 지적 호기심이 강하고 새로운 지식을 습득하는 것을 좋아합니다. \
              또한 예술형 성향도 높게 나타나 창의적인 분야에서도 역량을 발휘할 수 있습니다.",
    categories: &[
        ("탐구형", 80.0),
        ("예술형", 65.0),
        ("사회형", 50.0),
        ("관습형", 35.0),
        ("진취형", 45.0),
        ("현실형", 30.0),
    ],
    recommended_jobs: &[
        "연구원",
        "과학자",
        "엔지니어",
        "데이터 분석가",
        "IT 컨설턴트",
        "프로그래머",
        "생명과학자",
        "물리학자",
        "수학자",
        "통계학자",
    ],
};

const APTITUDE_RESULT: SampleResult = SampleResult {
    summary: "이 검사 결과에 따르면 당신은 논리-수학적 지능과 언어적 지능이 뛰어난 것으로 나타났습니다. \
              복잡한 문제를 분석하고 해결하는 능력이 뛰어나며, 의사소통 능력도 높은 편입니다.",
    categories: &[
        ("논리-수학적 지능", 85.0),
        ("언어적 지능", 75.0),
        ("공간적 지능", 60.0),
        ("대인관계 지능", 55.0),
        ("신체-운동적 지능", 40.0),
        ("음악적 지능", 50.0),
    ],
    recommended_jobs: &[
        "소프트웨어 개발자",
        "변호사",
        "경영 컨설턴트",
        "금융 분석가",
        "교수",
        "작가",
        "기자",
        "마케팅 전문가",
        "정책 분석가",
        "번역가",
    ],
};

const GENERAL_RESULT: SampleResult = SampleResult {
    summary: "이 검사 결과에 따르면 당신은 다양한 분야에 관심이 있으며, \
              특히 창의적인 문제 해결 능력이 뛰어난 것으로 나타났습니다.",
    categories: &[
        ("창의성", 75.0),
        ("분석력", 70.0),
        ("사회성", 65.0),
        ("리더십", 60.0),
        ("실행력", 55.0),
        ("안정성", 50.0),
    ],
    recommended_jobs: &[
        "교사",
        "상담사",
        "사회복지사",
        "인사 관리자",
        "마케팅 전문가",
        "창업가",
        "예술가",
        "디자이너",
    ],
};

pub fn test_result(test: &PsychTest) -> TestResult {
    let sample = match test.id.as_str() {
        "1" => &INTEREST_RESULT,
        "2" => &APTITUDE_RESULT,
        _ => &GENERAL_RESULT,
    };

    TestResult {
        test_id: test.id.clone(),
        test_name: test.name.clone(),
        completed_date: today(),
        summary: sample.summary.to_string(),
        categories: sample
            .categories
            .iter()
            .map(|(label, score)| (label.to_string(), *score))
            .collect(),
        recommended_jobs: sample.recommended_jobs.iter().map(|j| j.to_string()).collect(),
        result_url: Some(RESULT_URL.to_string()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

pub fn jobs(filter: &JobFilter) -> Vec<JobSummary> {
    [
        ("1", "소프트웨어 개발자", "IT·인터넷"),
        ("2", "데이터 과학자", "IT·인터넷"),
        ("3", "인공지능 전문가", "IT·인터넷"),
        ("4", "웹 디자이너", "예술·디자인·방송·스포츠"),
        ("5", "마케팅 전문가", "경영·사무·금융·보험"),
        ("6", "교사", "교육·법률·사회복지·경찰·소방·군인"),
        ("7", "의사", "보건·의료"),
        ("8", "간호사", "보건·의료"),
    ]
    .into_iter()
    .map(|(id, name, category)| JobSummary {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
    })
    .filter(|job| matches_exact(&job.category, filter.category.as_deref()))
    .filter(|job| matches_contains(&job.name, filter.keyword.as_deref()))
    .collect()
}

pub fn job_detail(job: &JobSummary) -> JobDetail {
    JobDetail {
        id: job.id.clone(),
        name: job.name.clone(),
        category: job.category.clone(),
        description: format!(
            "{}는 {} 분야의 직업으로, 다양한 업무를 수행합니다.",
            job.name, job.category
        ),
        work_tasks: numbered("관련 업무", 3),
        required_skills: numbered("필요 기술", 3),
        education: BTreeMap::from([
            ("high_school".to_string(), 10),
            ("college".to_string(), 20),
            ("university".to_string(), 50),
            ("graduate_school".to_string(), 20),
        ]),
        salary_range: "3000만원 ~ 7000만원".to_string(),
        job_outlook: "향후 10년간 고용 증가 예상".to_string(),
        related_majors: numbered("관련 학과", 3),
    }
}

/// Jobs suggested for each profile interest category.
pub fn recommended_jobs(interest: &str) -> &'static [&'static str] {
    match interest {
        "과학" => &["연구원", "생물학자", "화학자", "천문학자"],
        "기술" => &["소프트웨어 개발자", "데이터 과학자", "시스템 관리자"],
        "공학" => &["기계공학자", "전기공학자", "토목공학자", "항공우주공학자"],
        "예술" => &["그래픽 디자이너", "웹 디자이너", "미술가", "음악가"],
        "수학" => &["수학자", "통계학자", "보험계리사", "데이터 분석가"],
        "인문학" => &["작가", "번역가", "역사학자", "철학자"],
        "사회과학" => &["심리학자", "사회학자", "경제학자", "정치학자"],
        "경영" => &["경영컨설턴트", "마케팅 매니저", "인사 관리자", "재무 분석가"],
        "의학" => &["의사", "간호사", "약사", "의료기술자"],
        "법학" => &["변호사", "법무사", "검사", "판사"],
        _ => &[],
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Schools and departments
// ────────────────────────────────────────────────────────────────────────────

pub fn schools(filter: &SchoolFilter) -> Vec<School> {
    [
        ("1", "서울대학교", "대학교", "서울", "서울특별시 관악구"),
        ("2", "연세대학교", "대학교", "서울", "서울특별시 서대문구"),
        ("3", "고려대학교", "대학교", "서울", "서울특별시 성북구"),
        ("4", "한양대학교", "대학교", "서울", "서울특별시 성동구"),
        ("5", "경북대학교", "대학교", "경북", "대구광역시 북구"),
        ("6", "서울과학고등학교", "고등학교", "서울", "서울특별시 종로구"),
        ("7", "대전과학고등학교", "고등학교", "대전", "대전광역시 유성구"),
        ("8", "경기과학고등학교", "고등학교", "경기", "경기도 수원시"),
    ]
    .into_iter()
    .map(|(id, name, school_type, region, address)| School {
        id: id.to_string(),
        name: name.to_string(),
        school_type: school_type.to_string(),
        region: region.to_string(),
        address: address.to_string(),
    })
    .filter(|s| matches_exact(&s.school_type, filter.school_type.as_deref()))
    .filter(|s| matches_exact(&s.region, filter.region.as_deref()))
    .filter(|s| matches_contains(&s.name, filter.name.as_deref()))
    .collect()
}

pub fn school_detail(school: &School) -> SchoolDetail {
    // only universities list departments
    let departments = if school.school_type == "대학교" {
        [
            ("101", "컴퓨터공학과"),
            ("102", "경영학과"),
            ("103", "심리학과"),
            ("104", "기계공학과"),
            ("105", "화학과"),
        ]
        .into_iter()
        .map(|(id, name)| NamedRef {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
    } else {
        Vec::new()
    };

    SchoolDetail {
        school: school.clone(),
        website: format!("https://www.{}.ac.kr", school.name.replace(' ', "")),
        established: "1946년".to_string(),
        description: format!(
            "{}는 {}에 위치한 {}입니다. 다양한 학과와 프로그램을 제공합니다.",
            school.name, school.region, school.school_type
        ),
        departments,
        admission_info: format!(
            "{}의 입학 안내 정보입니다. 자세한 사항은 학교 홈페이지를 참고하세요.",
            school.name
        ),
    }
}

pub fn departments(filter: &DepartmentFilter) -> Vec<Department> {
    [
        ("201", "컴퓨터공학과", "공학계열"),
        ("202", "전자공학과", "공학계열"),
        ("203", "기계공학과", "공학계열"),
        ("204", "경영학과", "사회계열"),
        ("205", "경제학과", "사회계열"),
        ("206", "심리학과", "사회계열"),
        ("207", "화학과", "자연계열"),
        ("208", "물리학과", "자연계열"),
        ("209", "의학과", "의약계열"),
        ("210", "간호학과", "의약계열"),
    ]
    .into_iter()
    .map(|(id, name, category)| Department {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
    })
    .filter(|d| matches_exact(&d.category, filter.category.as_deref()))
    .filter(|d| matches_contains(&d.name, filter.name.as_deref()))
    .collect()
}

pub fn department_detail(department: &Department) -> DepartmentDetail {
    DepartmentDetail {
        id: department.id.clone(),
        name: department.name.clone(),
        category: department.category.clone(),
        description: format!(
            "{}는 {}에 속하는 학과로, 다양한 커리큘럼을 제공합니다.",
            department.name, department.category
        ),
        curriculum: vec![
            "기초 과목 1".to_string(),
            "기초 과목 2".to_string(),
            "심화 과목 1".to_string(),
            "심화 과목 2".to_string(),
            "실습 과목".to_string(),
        ],
        career_paths: numbered("진로 경로", 3),
        related_jobs: numbered("관련 직업", 3),
        universities: [("1", "서울대학교"), ("2", "연세대학교"), ("3", "고려대학교")]
            .into_iter()
            .map(|(id, name)| NamedRef {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Counseling cases
// ────────────────────────────────────────────────────────────────────────────

pub fn counseling_cases(filter: &CounselingFilter) -> Vec<CounselingCase> {
    [
        ("1", "진로 선택에 고민이 있어요", "진로탐색", "2023-05-15"),
        ("2", "수학과 진학에 대한 조언 부탁드립니다", "진학상담", "2023-06-20"),
        ("3", "프로그래머가 되고 싶어요", "직업정보", "2023-07-05"),
        ("4", "성적이 낮아서 걱정돼요", "학업고민", "2023-08-10"),
        ("5", "진로심리검사 결과 해석 도움이 필요해요", "적성/흥미", "2023-09-25"),
        ("6", "친구관계로 학교생활이 힘들어요", "학교생활", "2023-10-15"),
        ("7", "졸업 후 취업 준비 어떻게 해야 할까요?", "창업/취업", "2023-11-03"),
        ("8", "동아리 활동과 진로 연계 방법", "기타", "2023-12-01"),
    ]
    .into_iter()
    .map(|(id, title, category, date)| CounselingCase {
        id: id.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        date: date.to_string(),
    })
    .filter(|c| matches_exact(&c.category, filter.category.as_deref()))
    .filter(|c| matches_contains(&c.title, filter.keyword.as_deref()))
    .skip((filter.page.saturating_sub(1) as usize).saturating_mul(filter.size as usize))
    .take(filter.size as usize)
    .collect()
}

pub fn counseling_detail(case: &CounselingCase) -> CounselingDetail {
    CounselingDetail {
        case: case.clone(),
        question: format!(
            "안녕하세요. 저는 고등학교 2학년 학생입니다. {} 관련해서 고민이 있어 상담을 요청합니다...",
            case.title
        ),
        answer: format!(
            "안녕하세요. 학생의 고민 잘 읽었습니다. {} 관련 고민이신 것 같아요. \
             먼저, 이런 고민을 가진 학생들이 많이 있다는 것을 알려드리고 싶습니다. \
             여러 가지 방법을 고려해볼 수 있습니다...",
            case.category
        ),
        similar_cases: (1..=3)
            .map(|n| SimilarCase {
                id: format!("10{n}"),
                title: format!("비슷한 사례 {n}"),
            })
            .collect(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn numbered(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("{prefix} {n}")).collect()
}

fn matches_exact(value: &str, wanted: Option<&str>) -> bool {
    match wanted {
        Some(w) if !w.is_empty() => value == w,
        _ => true,
    }
}

fn matches_contains(value: &str, wanted: Option<&str>) -> bool {
    match wanted {
        Some(w) if !w.is_empty() => contains_ignore_case(value, w),
        _ => true,
    }
}
